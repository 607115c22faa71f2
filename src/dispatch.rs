//! Typed routing of assembled frames to the rendering collaborator.

use serde::de::DeserializeOwned;

use crate::error::TurnError;
use crate::models::{DonePayload, ThinkingPayload, TokenPayload};
use crate::sse::{event_types, Event, SseParseError};

/// Callbacks a turn reports through.
///
/// Per turn, exactly one of [`StreamHandler::on_done`] and
/// [`StreamHandler::on_error`] is called, once.
pub trait StreamHandler: Send {
    /// A status update; replaces any earlier one.
    fn on_status(&mut self, _status: &ThinkingPayload) {}

    /// An increment of generated text.
    fn on_token(&mut self, _text: &str) {}

    /// The terminal result. `payload.response` supersedes all token text.
    fn on_done(&mut self, payload: &DonePayload);

    /// The turn failed and nothing will be delivered.
    fn on_error(&mut self, error: &TurnError);
}

/// A frame payload validated against its event type.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPayload {
    Thinking(ThinkingPayload),
    Token(TokenPayload),
    Done(Box<DonePayload>),
    /// An event type this client does not handle
    Unknown(String),
}

impl StreamPayload {
    /// Validate an event's JSON payload against the shape of its type.
    pub fn from_event(event: Event) -> Result<Self, SseParseError> {
        let Event {
            event_type,
            payload,
        } = event;
        match event_type.as_str() {
            event_types::THINKING => parse(event_type, payload).map(StreamPayload::Thinking),
            event_types::TOKEN => parse(event_type, payload).map(StreamPayload::Token),
            event_types::DONE => {
                parse(event_type, payload).map(|done| StreamPayload::Done(Box::new(done)))
            }
            _ => Ok(StreamPayload::Unknown(event_type)),
        }
    }
}

fn parse<T: DeserializeOwned>(
    event_type: String,
    payload: serde_json::Value,
) -> Result<T, SseParseError> {
    serde_json::from_value(payload).map_err(|e| SseParseError::InvalidPayload {
        event_type,
        message: e.to_string(),
    })
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Status,
    Token,
    /// The terminal callback fired with this payload
    Terminal(Box<DonePayload>),
    /// Unknown type, or a terminal frame after the terminal already fired
    Ignored,
}

/// Routes frames of one session to a [`StreamHandler`].
#[derive(Debug, Default)]
pub struct PayloadDispatcher {
    status: Option<ThinkingPayload>,
    generation_started: bool,
    terminal_fired: bool,
}

impl PayloadDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one event.
    ///
    /// A payload that does not match its type is returned as an error and no
    /// callback fires.
    pub fn dispatch<H: StreamHandler + ?Sized>(
        &mut self,
        event: Event,
        handler: &mut H,
    ) -> Result<Dispatched, SseParseError> {
        if self.terminal_fired {
            tracing::debug!(event_type = %event.event_type, "Frame after terminal ignored");
            return Ok(Dispatched::Ignored);
        }

        match StreamPayload::from_event(event)? {
            StreamPayload::Thinking(status) => {
                handler.on_status(&status);
                self.status = Some(status);
                Ok(Dispatched::Status)
            }
            StreamPayload::Token(token) => {
                self.generation_started = true;
                handler.on_token(&token.text);
                Ok(Dispatched::Token)
            }
            StreamPayload::Done(payload) => {
                self.terminal_fired = true;
                handler.on_done(&payload);
                Ok(Dispatched::Terminal(payload))
            }
            StreamPayload::Unknown(event_type) => {
                tracing::debug!(event_type = %event_type, "Unknown event type ignored");
                Ok(Dispatched::Ignored)
            }
        }
    }

    /// The most recent status, if any.
    pub fn current_status(&self) -> Option<&ThinkingPayload> {
        self.status.as_ref()
    }

    /// Whether any token has been dispatched.
    pub fn generation_started(&self) -> bool {
        self.generation_started
    }

    pub fn terminal_fired(&self) -> bool {
        self.terminal_fired
    }
}
