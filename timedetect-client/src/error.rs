//! Error types for the TimeDetect client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the detection API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// A job-scoped call was made while no job id is tracked
    ///
    /// Pollers treat this as an immediately terminal failure: with no job in
    /// flight there is nothing to wait for.
    #[error("no job id is currently tracked")]
    JobAbsent,

    /// Response body could not be decoded into the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Request payload could not be encoded
    #[error("failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error means no job is tracked
    pub fn is_job_absent(&self) -> bool {
        matches!(self, Self::JobAbsent)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_predicates() {
        let not_found = ClientError::api(404, "no such dataset");
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());

        let unavailable = ClientError::api(503, "maintenance");
        assert!(unavailable.is_server_error());
        assert!(!unavailable.is_client_error());
    }

    #[test]
    fn test_job_absent_predicate() {
        assert!(ClientError::JobAbsent.is_job_absent());
        assert!(!ClientError::api(500, "boom").is_job_absent());
    }
}
