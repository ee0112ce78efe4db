//! Error types for the backend adapters.

use migrent_access::AccessError;
use thiserror::Error;

/// Errors that can occur talking to the hosted backend or report API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Non-success HTTP response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network error during a call.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Credentials rejected or missing.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request conflicts with existing state, e.g. a duplicate report.
    #[error("{0}")]
    Conflict(String),

    /// Requested change is not allowed from the record's current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Required configuration is missing.
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

impl From<BackendError> for AccessError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(id) => AccessError::NotFound(id),
            BackendError::Parse(msg) => AccessError::Malformed(msg),
            BackendError::Serialization(e) => AccessError::Malformed(e.to_string()),
            other => AccessError::Lookup(other.to_string()),
        }
    }
}
