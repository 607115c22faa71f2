//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP transport (buffered and streaming POST, GET)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
