//! Error types for the inference client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the inference API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned a non-2xx status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Best-effort message from the response body
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client was constructed with unusable settings
    #[error("Invalid client configuration: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the access token was rejected
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if the request was throttled
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if no HTTP response was received at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.status().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = ClientError::api_error(429, "slow down");
        assert_eq!(err.status(), Some(429));
        assert!(err.is_rate_limited());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = ClientError::api_error(503, "unavailable");
        assert!(err.is_server_error());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_parse_error_has_no_status() {
        let err = ClientError::ParseError("missing field `task_id`".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "Failed to parse response: missing field `task_id`"
        );
    }
}
