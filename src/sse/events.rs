//! Line, event and error types for the streaming protocol.

use thiserror::Error;

/// Represents a classified stream line.
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: token")
    Event(String),
    /// Data payload (e.g., "data: {\"text\": \"hello\"}")
    Data(String),
    /// Empty line
    Empty,
    /// Comment line (starts with ':') or anything unrecognised
    Comment(String),
}

/// Event type names understood by the dispatcher.
pub mod event_types {
    pub const THINKING: &str = "thinking";
    pub const TOKEN: &str = "token";
    pub const DONE: &str = "done";
}

/// A complete frame: an `event:` line followed by a `data:` line whose
/// remainder parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Value of the `event:` line, trimmed
    pub event_type: String,
    /// Parsed `data:` payload
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// Whether this is the terminal `done` frame.
    pub fn is_terminal(&self) -> bool {
        self.event_type == event_types::DONE
    }
}

/// A frame that was dropped instead of dispatched.
///
/// These never abort a session. They are counted and logged so backend
/// protocol bugs stay visible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseParseError {
    /// The `data:` remainder was not JSON
    #[error("Invalid JSON for event '{event_type}': {message}")]
    InvalidJson { event_type: String, message: String },

    /// JSON was valid but did not match the payload shape for its type
    #[error("Invalid '{event_type}' payload: {message}")]
    InvalidPayload { event_type: String, message: String },
}

impl SseParseError {
    pub fn event_type(&self) -> &str {
        match self {
            SseParseError::InvalidJson { event_type, .. }
            | SseParseError::InvalidPayload { event_type, .. } => event_type,
        }
    }
}

/// A complete line was not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid UTF-8 in stream at line {line_number}: {message}")]
pub struct DecodeError {
    /// 1-based index of the offending line within the session
    pub line_number: u64,
    pub message: String,
}
