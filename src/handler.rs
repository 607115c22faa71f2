//! Channel-backed stream handler.
//!
//! Lets a rendering loop run on its own task: the coordinator calls
//! [`ChannelHandler`], which forwards every callback as a [`StreamUpdate`].

use tokio::sync::mpsc;

use crate::dispatch::StreamHandler;
use crate::error::TurnError;
use crate::models::{DonePayload, ThinkingPayload};

/// One callback, as a message.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    Status(ThinkingPayload),
    Token(String),
    Done(Box<DonePayload>),
    Error(TurnError),
}

impl StreamUpdate {
    /// Whether this is the last update of a turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamUpdate::Done(_) | StreamUpdate::Error(_))
    }
}

#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<StreamUpdate>,
}

impl ChannelHandler {
    pub fn new(tx: mpsc::UnboundedSender<StreamUpdate>) -> Self {
        Self { tx }
    }

    /// Create a handler and the receiver for its updates.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, update: StreamUpdate) {
        // Receiver gone means the renderer stopped caring about this turn
        if self.tx.send(update).is_err() {
            tracing::trace!("Stream update dropped, receiver closed");
        }
    }
}

impl StreamHandler for ChannelHandler {
    fn on_status(&mut self, status: &ThinkingPayload) {
        self.send(StreamUpdate::Status(status.clone()));
    }

    fn on_token(&mut self, text: &str) {
        self.send(StreamUpdate::Token(text.to_string()));
    }

    fn on_done(&mut self, payload: &DonePayload) {
        self.send(StreamUpdate::Done(Box::new(payload.clone())));
    }

    fn on_error(&mut self, error: &TurnError) {
        self.send(StreamUpdate::Error(error.clone()));
    }
}
