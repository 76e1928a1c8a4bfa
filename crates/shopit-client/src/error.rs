use std::path::PathBuf;

use shopit_core::SearchError;
use thiserror::Error;

/// Errors returned by the engine HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine answered with a non-2xx status. `message` is its `error` field.
    #[error("engine returned HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<ClientError> for SearchError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::UnexpectedStatus { status: 400, message } => SearchError::InvalidInput {
                field: "request",
                reason: message,
            },
            other => SearchError::EngineUnavailable(other.to_string()),
        }
    }
}

/// Failures of the persisted history backend. The cache logs these and
/// carries on in memory; they never reach a search caller.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize search history: {0}")]
    Serialize(#[from] serde_json::Error),
}
