use thiserror::Error;

use crate::core::timestamp::FormatError;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Invalid generation setting: {0}")]
    ConfigError(String),

    #[error("Completion backend is not configured: {0}")]
    ConfigurationError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to read completion response: {0}")]
    BackendError(String),
}

impl DigestError {
    /// Whether the failure was caused by the caller's input rather than by
    /// this service or its backend.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Format(_) | Self::InvalidInput(_) | Self::MissingParameters | Self::ConfigError(_)
        )
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        DigestError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(error: serde_json::Error) -> Self {
        DigestError::InvalidInput(error.to_string())
    }
}
