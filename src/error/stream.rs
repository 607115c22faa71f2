//! Streaming-path failures.
//!
//! Whether one of these reaches the user depends on when it happened: before
//! the first dispatched event the coordinator falls back to the synchronous
//! endpoint, afterwards it surfaces the error.

use std::fmt;
use std::time::Duration;

use crate::sse::DecodeError;
use crate::traits::HttpError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The streaming request could not be opened (connect failure or a
    /// non-success status before any body byte).
    Open(HttpError),

    /// The stream closed cleanly without producing a single byte.
    Empty,

    /// The connection broke while reading the body.
    Transport(HttpError),

    /// A complete line was not valid UTF-8.
    Decode(DecodeError),

    /// No chunk arrived within the inactivity window.
    Timeout { after: Duration },

    /// The stream closed after producing data but without a terminal frame.
    AnomalousTermination { events_dispatched: u64 },
}

impl StreamError {
    /// Check if this error is likely transient and the turn can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::Open(_)
                | StreamError::Empty
                | StreamError::Transport(_)
                | StreamError::Timeout { .. }
                | StreamError::AnomalousTermination { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Open(_) => "Could not reach the assistant.".to_string(),
            StreamError::Empty => "The assistant sent an empty reply.".to_string(),
            StreamError::Transport(_) => {
                "Connection to the assistant was lost mid-reply. Please try again.".to_string()
            }
            StreamError::Decode(_) => {
                "Received unreadable data from the assistant. Please try again.".to_string()
            }
            StreamError::Timeout { after } => format!(
                "No response from the assistant for {} seconds. Please try again.",
                after.as_secs()
            ),
            StreamError::AnomalousTermination { .. } => {
                "The reply ended before it was complete. Please try again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Open(_) => "E_STREAM_OPEN",
            StreamError::Empty => "E_STREAM_EMPTY",
            StreamError::Transport(_) => "E_STREAM_CONN",
            StreamError::Decode(_) => "E_STREAM_DECODE",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
            StreamError::AnomalousTermination { .. } => "E_STREAM_TRUNCATED",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Open(err) => write!(f, "Failed to open stream: {}", err),
            StreamError::Empty => write!(f, "Stream closed without data"),
            StreamError::Transport(err) => write!(f, "Stream connection lost: {}", err),
            StreamError::Decode(err) => write!(f, "Stream decode failed: {}", err),
            StreamError::Timeout { after } => {
                write!(f, "Stream timeout after {} ms of inactivity", after.as_millis())
            }
            StreamError::AnomalousTermination { events_dispatched } => write!(
                f,
                "Stream ended without a terminal event after {} events",
                events_dispatched
            ),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Open(err) | StreamError::Transport(err) => Some(err),
            StreamError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecodeError> for StreamError {
    fn from(err: DecodeError) -> Self {
        StreamError::Decode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomalous_termination() {
        let err = StreamError::AnomalousTermination {
            events_dispatched: 1,
        };
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "E_STREAM_TRUNCATED");
        assert_eq!(
            err.to_string(),
            "Stream ended without a terminal event after 1 events"
        );
    }

    #[test]
    fn test_decode_not_retryable() {
        let err: StreamError = DecodeError {
            line_number: 4,
            message: "bad byte".to_string(),
        }
        .into();
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "E_STREAM_DECODE");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_timeout_messages() {
        let err = StreamError::Timeout {
            after: Duration::from_secs(30),
        };
        assert!(err.user_message().contains("30 seconds"));
        assert_eq!(err.to_string(), "Stream timeout after 30000 ms of inactivity");
    }

    #[test]
    fn test_open_wraps_http_error() {
        let err = StreamError::Open(HttpError::ServerError {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to open stream: Server error (500): boom"
        );
        assert_eq!(err.error_code(), "E_STREAM_OPEN");
    }
}
