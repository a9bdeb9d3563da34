//! RSMF digest - summarises chat transcripts one time bucket at a time.
//!
//! This crate implements a single API Lambda that accepts an RSMF
//! (Relativity Short Message Format) transcript, splits its messages into
//! week, month or fixed-day buckets, and asks a text-generation backend for
//! an HTML summary of each bucket.
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - chrono for timestamp parsing and calendar arithmetic
//! - reqwest for the completion backend, behind a swappable transport trait
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use rsmf_digest::ai::CompletionClient;
//! use rsmf_digest::core::config::AppConfig;
//! use rsmf_digest::core::models::Message;
//! use rsmf_digest::pipeline::{self, RunOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     rsmf_digest::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let client = CompletionClient::from_config(&config)?;
//!
//!     let messages = Message::parse_all(&serde_json::json!([
//!         { "date": "2024-01-01T10:00:00Z", "sender": "ann", "recipients": ["bob"], "body": "Kickoff at 3" },
//!         { "date": "2024-01-10T10:00:00Z", "sender": "bob", "recipients": ["ann"], "body": "Moved to Friday" }
//!     ]))?;
//!
//!     match pipeline::run(&client, "month", &messages, "Summarise the below chat.", 0.2).await? {
//!         RunOutcome::Summaries(results) => {
//!             for result in results {
//!                 println!("{}: {}", result.date, result.completion);
//!             }
//!         }
//!         RunOutcome::InvalidDirective(message) => println!("{message}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod api;
pub mod bucketing;
pub mod core;
pub mod errors;
pub mod pipeline;
pub mod prompt;
pub mod transcript;

pub use errors::DigestError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`). It
/// should be called once at the start of the Lambda process; repeated calls
/// are ignored.
///
/// # Example
///
/// ```
/// rsmf_digest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
