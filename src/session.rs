//! One streaming exchange for one user turn.
//!
//! A [`StreamSession`] wires a [`FrameDecoder`], an [`EventAssembler`] and a
//! [`PayloadDispatcher`] together and tracks whether the session is still
//! accepting bytes. Sessions are created per turn and never reused.

use uuid::Uuid;

use crate::dispatch::{Dispatched, PayloadDispatcher, StreamHandler};
use crate::models::DonePayload;
use crate::sse::{DecodeError, EventAssembler, FrameDecoder, SseParseError};

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub bytes_received: u64,
    pub lines_decoded: u64,
    /// Events that reached a handler callback
    pub events_dispatched: u64,
    /// Frames dropped for invalid JSON or an invalid payload shape
    pub frames_dropped: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Accepting bytes
    Open,
    /// The terminal event was dispatched
    Done,
    /// Decoding failed; nothing more will be processed
    Failed,
}

/// Result of feeding bytes to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// All complete lines were processed; more bytes are expected
    Pending,
    /// The terminal event was dispatched; the session is closed
    Terminal(Box<DonePayload>),
    /// The session was no longer open and the bytes were discarded
    Discarded,
}

#[derive(Debug)]
pub struct StreamSession {
    id: Uuid,
    decoder: FrameDecoder,
    assembler: EventAssembler,
    dispatcher: PayloadDispatcher,
    phase: SessionPhase,
    stats: SessionStats,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            decoder: FrameDecoder::new(),
            assembler: EventAssembler::new(),
            dispatcher: PayloadDispatcher::new(),
            phase: SessionPhase::Open,
            stats: SessionStats::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Whether at least one event has reached the handler.
    pub fn has_dispatched(&self) -> bool {
        self.stats.events_dispatched > 0
    }

    /// Process one raw chunk.
    ///
    /// Lines are decoded, assembled and dispatched in arrival order. Once the
    /// terminal event is dispatched the remainder of the chunk, and every
    /// later chunk, is discarded.
    pub fn feed<H: StreamHandler + ?Sized>(
        &mut self,
        chunk: &[u8],
        handler: &mut H,
    ) -> Result<FeedOutcome, DecodeError> {
        if self.phase != SessionPhase::Open {
            tracing::trace!(session_id = %self.id, bytes = chunk.len(), "Discarding bytes after close");
            return Ok(FeedOutcome::Discarded);
        }

        self.stats.bytes_received += chunk.len() as u64;
        self.decoder.push(chunk);

        while let Some(line) = self.decoder.next_line() {
            let line = self.check_decoded(line)?;
            if let Some(payload) = self.process_line(&line, handler) {
                return Ok(self.close(payload));
            }
        }

        Ok(FeedOutcome::Pending)
    }

    /// Flush the carried partial line at end of stream.
    pub fn finish<H: StreamHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<FeedOutcome, DecodeError> {
        if self.phase != SessionPhase::Open {
            return Ok(FeedOutcome::Discarded);
        }

        if let Some(line) = self.decoder.finish() {
            let line = self.check_decoded(line)?;
            if let Some(payload) = self.process_line(&line, handler) {
                return Ok(self.close(payload));
            }
        }

        Ok(FeedOutcome::Pending)
    }

    fn check_decoded(
        &mut self,
        line: Result<String, DecodeError>,
    ) -> Result<String, DecodeError> {
        line.map_err(|err| {
            tracing::warn!(session_id = %self.id, error = %err, "Stream decode failed");
            self.phase = SessionPhase::Failed;
            err
        })
    }

    fn process_line<H: StreamHandler + ?Sized>(
        &mut self,
        line: &str,
        handler: &mut H,
    ) -> Option<Box<DonePayload>> {
        self.stats.lines_decoded += 1;

        let event = match self.assembler.feed_line(line) {
            Ok(Some(event)) => event,
            Ok(None) => return None,
            Err(err) => {
                self.drop_frame(&err);
                return None;
            }
        };

        match self.dispatcher.dispatch(event, handler) {
            Ok(Dispatched::Terminal(payload)) => {
                self.stats.events_dispatched += 1;
                Some(payload)
            }
            Ok(Dispatched::Status) | Ok(Dispatched::Token) => {
                self.stats.events_dispatched += 1;
                None
            }
            Ok(Dispatched::Ignored) => None,
            Err(err) => {
                self.drop_frame(&err);
                None
            }
        }
    }

    fn drop_frame(&mut self, err: &SseParseError) {
        self.stats.frames_dropped += 1;
        tracing::warn!(
            session_id = %self.id,
            event_type = err.event_type(),
            dropped = self.stats.frames_dropped,
            "Dropping malformed frame: {}",
            err
        );
    }

    fn close(&mut self, payload: Box<DonePayload>) -> FeedOutcome {
        self.phase = SessionPhase::Done;
        tracing::debug!(
            session_id = %self.id,
            events = self.stats.events_dispatched,
            dropped = self.stats.frames_dropped,
            "Session closed by terminal event"
        );
        FeedOutcome::Terminal(payload)
    }
}
