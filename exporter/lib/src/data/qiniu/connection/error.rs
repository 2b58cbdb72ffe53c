use thiserror::Error;

use crate::error::Error as ExporterError;

/// Error type for provider connection operations
#[derive(Debug, Error)]
pub enum ProviderConnectionError {
    /// Network or transport-related errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Request timeout errors
    #[error("Request timeout")]
    Timeout,

    /// Authorization token could not be computed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Host or path do not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for provider connection operations
pub type ProviderResult<T> = Result<T, ProviderConnectionError>;

impl From<reqwest::Error> for ProviderConnectionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<ProviderConnectionError> for ExporterError {
    fn from(e: ProviderConnectionError) -> Self {
        match e {
            ProviderConnectionError::Signing(msg) => ExporterError::Signing(msg),
            ProviderConnectionError::Serialization(msg) => ExporterError::Decode(msg),
            other => ExporterError::Transport(other.to_string()),
        }
    }
}
