//! Streaming response protocol parsing.
//!
//! The backend streams repeated two-line frames:
//! - `event: <type>` - event type line
//! - `data: <json>` - data payload line
//!
//! Blank lines and lines starting with `:` carry nothing.
//!
//! # Module structure
//! - `decoder` - bytes to complete lines ([`FrameDecoder`])
//! - `assembler` - lines to frames ([`EventAssembler`])
//! - `events` - line, event and error types

mod assembler;
mod decoder;
mod events;

pub use assembler::{parse_sse_line, AssemblerState, EventAssembler};
pub use decoder::{decode_all, FrameDecoder};
pub use events::{event_types, DecodeError, Event, SseLine, SseParseError};
