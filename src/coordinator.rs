//! Turn supervision.
//!
//! [`FallbackCoordinator::run_turn`] drives one [`StreamSession`] from the
//! streaming endpoint and guarantees exactly one terminal outcome per turn:
//! a streamed `done`, the synchronous fallback's result, or one reported
//! error.
//!
//! Whether a streaming failure falls back depends on how far the stream got.
//! A stream that ended after delivering any byte, whether by a clean close
//! or a broken connection, is surfaced: the backend may already have acted
//! on the turn. A stream that stalled or failed to decode falls back until
//! an event has reached the handler.

use bytes::Bytes;
use futures::StreamExt;
use std::time::Duration;
use uuid::Uuid;

use crate::adapters::ReqwestHttpClient;
use crate::client::MakeItClient;
use crate::config::ClientConfig;
use crate::dispatch::StreamHandler;
use crate::error::{StreamError, TurnError};
use crate::models::{ChatRequest, DonePayload};
use crate::session::{FeedOutcome, SessionStats, StreamSession};
use crate::traits::{ByteStream, HttpClient, HttpError};

/// Where the terminal payload of a turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPath {
    Streamed,
    Fallback,
}

/// Successful end of a turn. Mirrors the `on_done` callback that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnCompletion {
    pub payload: DonePayload,
    pub path: CompletionPath,
    pub session_id: Uuid,
    pub stats: SessionStats,
}

pub struct FallbackCoordinator<C: HttpClient = ReqwestHttpClient> {
    client: MakeItClient<C>,
    chunk_timeout: Option<Duration>,
}

impl FallbackCoordinator<ReqwestHttpClient> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(MakeItClient::from_config(config)).with_chunk_timeout(config.chunk_timeout)
    }
}

impl<C: HttpClient> FallbackCoordinator<C> {
    pub fn new(client: MakeItClient<C>) -> Self {
        Self {
            client,
            chunk_timeout: None,
        }
    }

    /// Maximum silence between two chunks before the stream is abandoned.
    pub fn with_chunk_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.chunk_timeout = timeout;
        self
    }

    pub fn client(&self) -> &MakeItClient<C> {
        &self.client
    }

    /// Run one user turn.
    ///
    /// Exactly one of `handler.on_done` or `handler.on_error` fires, and the
    /// returned value mirrors it. Dropping the returned future abandons the
    /// turn and releases the stream.
    pub async fn run_turn<H: StreamHandler + ?Sized>(
        &self,
        request: &ChatRequest,
        handler: &mut H,
    ) -> Result<TurnCompletion, TurnError> {
        let mut session = StreamSession::new();
        tracing::debug!(session_id = %session.id(), "Starting turn");

        let streamed = self.stream_turn(request, &mut session, handler).await;
        let stats = session.stats();

        match streamed {
            Ok(payload) => {
                tracing::debug!(
                    session_id = %session.id(),
                    bytes = stats.bytes_received,
                    events = stats.events_dispatched,
                    "Turn completed from stream"
                );
                Ok(TurnCompletion {
                    payload: *payload,
                    path: CompletionPath::Streamed,
                    session_id: session.id(),
                    stats,
                })
            }
            Err(err) if should_fall_back(&err, &session) => {
                self.fall_back(request, err, &session, handler).await
            }
            Err(err) => {
                let err = TurnError::Stream(err);
                tracing::error!(
                    session_id = %session.id(),
                    code = err.error_code(),
                    events = stats.events_dispatched,
                    "Streaming failed after data arrived: {}",
                    err
                );
                handler.on_error(&err);
                Err(err)
            }
        }
    }

    async fn stream_turn<H: StreamHandler + ?Sized>(
        &self,
        request: &ChatRequest,
        session: &mut StreamSession,
        handler: &mut H,
    ) -> Result<Box<DonePayload>, StreamError> {
        let mut stream = self
            .client
            .open_stream(request)
            .await
            .map_err(StreamError::Open)?;

        loop {
            match self.next_chunk(&mut stream).await? {
                Some(Ok(chunk)) => {
                    if let FeedOutcome::Terminal(payload) = session.feed(&chunk, handler)? {
                        return Ok(payload);
                    }
                }
                Some(Err(err)) => return Err(StreamError::Transport(err)),
                None => break,
            }
        }

        if let FeedOutcome::Terminal(payload) = session.finish(handler)? {
            return Ok(payload);
        }

        let stats = session.stats();
        if stats.bytes_received == 0 {
            Err(StreamError::Empty)
        } else {
            Err(StreamError::AnomalousTermination {
                events_dispatched: stats.events_dispatched,
            })
        }
    }

    async fn next_chunk(
        &self,
        stream: &mut ByteStream,
    ) -> Result<Option<Result<Bytes, HttpError>>, StreamError> {
        match self.chunk_timeout {
            Some(after) => tokio::time::timeout(after, stream.next())
                .await
                .map_err(|_| StreamError::Timeout { after }),
            None => Ok(stream.next().await),
        }
    }

    async fn fall_back<H: StreamHandler + ?Sized>(
        &self,
        request: &ChatRequest,
        cause: StreamError,
        session: &StreamSession,
        handler: &mut H,
    ) -> Result<TurnCompletion, TurnError> {
        tracing::warn!(
            session_id = %session.id(),
            code = cause.error_code(),
            "Streaming unavailable, falling back to synchronous chat: {}",
            cause
        );

        match self.client.chat(request).await {
            Ok(payload) => {
                handler.on_done(&payload);
                Ok(TurnCompletion {
                    payload,
                    path: CompletionPath::Fallback,
                    session_id: session.id(),
                    stats: session.stats(),
                })
            }
            Err(fallback) => {
                let err = TurnError::FallbackFailed {
                    stream: cause,
                    fallback,
                };
                tracing::error!(session_id = %session.id(), "{}", err);
                handler.on_error(&err);
                Err(err)
            }
        }
    }
}

/// An ended stream falls back only if it never delivered a byte. Stalls and
/// decode failures fall back until the first event was dispatched.
fn should_fall_back(err: &StreamError, session: &StreamSession) -> bool {
    match err {
        StreamError::Open(_) | StreamError::Empty => true,
        StreamError::AnomalousTermination { .. } => false,
        StreamError::Transport(_) => session.stats().bytes_received == 0,
        StreamError::Decode(_) | StreamError::Timeout { .. } => !session.has_dispatched(),
    }
}
