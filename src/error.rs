// src/error.rs
//! Failure taxonomy for directory operations

use thiserror::Error;

/// Fallback text when the backend rejects a request without saying why.
pub const GENERIC_FAILURE: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The request exceeded its deadline and was aborted.
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    /// Backend answered `ok: false`.
    #[error("{0}")]
    Server(String),

    /// Bearer token missing server-side acceptance (HTTP 401).
    #[error("session expired, please log in again")]
    Unauthorized,

    /// Rejected locally, no request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl DirectoryError {
    /// Aborted requests are dropped without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, DirectoryError::Timeout)
    }

    pub fn server(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => DirectoryError::Server(m),
            _ => DirectoryError::Server(GENERIC_FAILURE.to_string()),
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectoryError::Timeout
        } else if err.is_decode() {
            DirectoryError::Decode(err.to_string())
        } else {
            DirectoryError::Network(err.to_string())
        }
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_timeout_is_silent() {
        assert!(DirectoryError::Timeout.is_silent());
        assert!(!DirectoryError::Unauthorized.is_silent());
        assert!(!DirectoryError::Network("reset".into()).is_silent());
    }

    #[test]
    fn test_server_message_fallback() {
        assert_eq!(
            DirectoryError::server(Some("Employee not found".into())).to_string(),
            "Employee not found"
        );
        assert_eq!(DirectoryError::server(None).to_string(), GENERIC_FAILURE);
        assert_eq!(DirectoryError::server(Some(" ".into())).to_string(), GENERIC_FAILURE);
    }
}
