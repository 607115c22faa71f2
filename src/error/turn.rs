//! Failures a user turn can surface.

use thiserror::Error;

use super::client::ClientError;
use super::stream::StreamError;

/// The only errors that reach a [`crate::dispatch::StreamHandler`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    /// The stream had already delivered events, then failed.
    #[error("{0}")]
    Stream(StreamError),

    /// Streaming produced nothing and the synchronous request failed too.
    #[error("Streaming failed ({stream}) and fallback failed ({fallback})")]
    FallbackFailed {
        stream: StreamError,
        fallback: ClientError,
    },
}

impl TurnError {
    pub fn is_retryable(&self) -> bool {
        match self {
            TurnError::Stream(err) => err.is_retryable(),
            TurnError::FallbackFailed { fallback, .. } => fallback.is_retryable(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            TurnError::Stream(err) => err.user_message(),
            TurnError::FallbackFailed { fallback, .. } => fallback.user_message(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TurnError::Stream(err) => err.error_code(),
            TurnError::FallbackFailed { .. } => "E_TURN_FALLBACK",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::HttpError;

    #[test]
    fn test_fallback_failed_display() {
        let err = TurnError::FallbackFailed {
            stream: StreamError::Open(HttpError::ConnectionFailed("refused".to_string())),
            fallback: ClientError::Http(HttpError::ConnectionFailed("refused".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "Streaming failed (Failed to open stream: Connection failed: refused) and fallback failed (HTTP error: Connection failed: refused)"
        );
        assert_eq!(err.error_code(), "E_TURN_FALLBACK");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_stream_delegates() {
        let err = TurnError::Stream(StreamError::AnomalousTermination {
            events_dispatched: 2,
        });
        assert_eq!(err.error_code(), "E_STREAM_TRUNCATED");
        assert_eq!(
            err.user_message(),
            "The reply ended before it was complete. Please try again."
        );
    }
}
