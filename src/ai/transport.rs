//! HTTP transport for the completion backend.
//!
//! The client talks to the backend through [`CompletionTransport`] so the
//! network layer can be swapped out. TLS relaxation and deadlines live in a
//! [`TransportConfig`] owned by each transport, never in process-wide state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::DigestError;

/// Per-client transport settings.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Accept self-signed or otherwise unverifiable certificates.
    pub accept_invalid_certs: bool,
    /// Deadline for a whole request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Status and decoded body of a backend reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// POSTs `body` as JSON with a bearer `Authorization` header.
    ///
    /// Non-2xx replies are returned as responses, not errors; only failures
    /// to exchange a request at all are errors.
    async fn post_json(
        &self,
        url: &Url,
        bearer: &str,
        body: &Value,
    ) -> Result<TransportResponse, DigestError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`DigestError::HttpError`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &TransportConfig) -> Result<Self, DigestError> {
        let mut builder = Client::builder().danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            DigestError::HttpError(format!("Failed to build completion HTTP client: {e}"))
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &Url,
        bearer: &str,
        body: &Value,
    ) -> Result<TransportResponse, DigestError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| DigestError::HttpError(format!("Completion request failed: {e}")))?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            DigestError::HttpError(format!(
                "Failed to read completion response body (status {status}): {e}"
            ))
        })?;
        debug!(status, bytes = bytes.len(), "Completion backend replied");

        Ok(TransportResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
