//! Stream handler that records callbacks in order.

use crate::dispatch::StreamHandler;
use crate::error::TurnError;
use crate::models::{DonePayload, ThinkingPayload};

/// One recorded callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    Status(ThinkingPayload),
    Token(String),
    Done(DonePayload),
    Error(TurnError),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    callbacks: Vec<Callback>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.callbacks
            .iter()
            .filter_map(|c| match c {
                Callback::Status(status) => Some(status.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All token text concatenated.
    pub fn token_text(&self) -> String {
        self.callbacks
            .iter()
            .filter_map(|c| match c {
                Callback::Token(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn done(&self) -> Option<&DonePayload> {
        self.callbacks.iter().find_map(|c| match c {
            Callback::Done(payload) => Some(payload),
            _ => None,
        })
    }

    pub fn error(&self) -> Option<&TurnError> {
        self.callbacks.iter().find_map(|c| match c {
            Callback::Error(err) => Some(err),
            _ => None,
        })
    }

    pub fn done_count(&self) -> usize {
        self.callbacks
            .iter()
            .filter(|c| matches!(c, Callback::Done(_)))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.callbacks
            .iter()
            .filter(|c| matches!(c, Callback::Error(_)))
            .count()
    }
}

impl StreamHandler for RecordingHandler {
    fn on_status(&mut self, status: &ThinkingPayload) {
        self.callbacks.push(Callback::Status(status.clone()));
    }

    fn on_token(&mut self, text: &str) {
        self.callbacks.push(Callback::Token(text.to_string()));
    }

    fn on_done(&mut self, payload: &DonePayload) {
        self.callbacks.push(Callback::Done(payload.clone()));
    }

    fn on_error(&mut self, error: &TurnError) {
        self.callbacks.push(Callback::Error(error.clone()));
    }
}
