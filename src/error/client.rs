//! Errors from single request/response exchanges.

use thiserror::Error;

use crate::traits::HttpError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The request never got a response
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The body did not match the expected shape
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// The backend has no such resource, reported by status or in the body
    #[error("Not found: {resource}: {message}")]
    NotFound { resource: String, message: String },
}

impl ClientError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(HttpError::InvalidUrl(_)) => false,
            ClientError::Http(_) => true,
            ClientError::Status { status, .. } => *status >= 500 || *status == 429,
            ClientError::InvalidResponse { .. } | ClientError::NotFound { .. } => false,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(_) => "Could not reach the assistant.".to_string(),
            ClientError::Status { status, .. } if *status >= 500 => {
                "The assistant is having trouble right now. Please try again.".to_string()
            }
            ClientError::Status { status, .. } => {
                format!("The assistant rejected the request ({}).", status)
            }
            ClientError::InvalidResponse { .. } => {
                "The assistant sent a reply this client cannot read.".to_string()
            }
            ClientError::NotFound { resource, .. } => format!("'{}' was not found.", resource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryability() {
        let server = ClientError::Status {
            status: 503,
            message: "busy".to_string(),
        };
        let client = ClientError::Status {
            status: 422,
            message: "bad".to_string(),
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(client.user_message().contains("422"));
    }

    #[test]
    fn test_not_found_is_final() {
        let err = ClientError::NotFound {
            resource: "crane".to_string(),
            message: "Model not found".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "'crane' was not found.");
        assert_eq!(err.to_string(), "Not found: crane: Model not found");
    }

    #[test]
    fn test_from_http_error() {
        let err: ClientError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "HTTP error: Connection failed: refused");
    }
}
