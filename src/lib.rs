//! MakeIt - client for a chat-style crafting assistant
//!
//! The core is the streaming-reply protocol: [`sse::FrameDecoder`] turns
//! arriving bytes into lines, [`sse::EventAssembler`] pairs them into events,
//! [`dispatch::PayloadDispatcher`] routes typed payloads to a
//! [`dispatch::StreamHandler`], and [`coordinator::FallbackCoordinator`]
//! supervises each turn, falling back to the synchronous endpoint when
//! streaming cannot deliver.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
