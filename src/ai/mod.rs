//! Completion backend access

pub mod client;
pub mod transport;

// Re-export main types for convenience
pub use client::{CompletionClient, coerce_temperature};
pub use transport::{CompletionTransport, HttpTransport, TransportConfig, TransportResponse};
