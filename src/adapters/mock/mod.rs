//! Test doubles.
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses and streams
//! - [`RecordingHandler`] - stream handler that records every callback

pub mod handler;
pub mod http;

pub use handler::{Callback, RecordingHandler};
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
