//! Error types.
//!
//! | Failure | Type | Reaches the user |
//! |---------|------|------------------|
//! | Stream cannot open | [`StreamError::Open`] | no, falls back |
//! | Malformed frame | [`crate::sse::SseParseError`] | no, frame dropped and counted |
//! | Stream ends early after events | [`StreamError::AnomalousTermination`] | yes |
//! | Invalid UTF-8 | [`StreamError::Decode`] | only after events were dispatched |
//! | Single-exchange call fails | [`ClientError`] | yes for direct calls |
//! | Streaming and fallback both fail | [`TurnError::FallbackFailed`] | yes |

mod client;
mod stream;
mod turn;

pub use client::ClientError;
pub use stream::StreamError;
pub use turn::TurnError;
