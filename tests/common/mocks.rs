//! Mock backend configurations.
//!
//! Re-exports the mock implementations from `makeit::adapters::mock` and
//! wires them to the chat endpoints.

pub use makeit::adapters::mock::{Callback, MockHttpClient, MockResponse, RecordingHandler};
pub use makeit::traits::HttpError;

use bytes::Bytes;
use makeit::client::MakeItClient;
use makeit::coordinator::FallbackCoordinator;
use serde_json::Value;

use super::TEST_BASE_URL;

/// Builder for a mock backend serving `/chat/stream` and `/chat`.
pub struct MockBackendBuilder {
    client: MockHttpClient,
}

impl MockBackendBuilder {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Stream these chunks from `/chat/stream`, then close cleanly.
    pub fn with_stream<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client
            .set_response(&stream_url(), MockResponse::chunks(chunks));
        self
    }

    /// Stream raw byte chunks from `/chat/stream`.
    pub fn with_stream_bytes(self, chunks: Vec<Vec<u8>>) -> Self {
        self.client.set_response(
            &stream_url(),
            MockResponse::Stream(chunks.into_iter().map(Bytes::from).collect()),
        );
        self
    }

    /// Stream these chunks, then drop the connection.
    pub fn with_stream_then_drop<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks = chunks.into_iter().map(|c| Bytes::from(c.into())).collect();
        self.client.set_response(
            &stream_url(),
            MockResponse::StreamThenError(chunks, HttpError::Io("connection reset".to_string())),
        );
        self
    }

    /// Answer `/chat/stream` with a status before any body byte.
    pub fn with_stream_status(self, status: u16) -> Self {
        self.client.set_response(
            &stream_url(),
            MockResponse::json(status, &serde_json::json!({"detail": "stream failed"})),
        );
        self
    }

    /// Answer the synchronous `/chat` endpoint.
    pub fn with_fallback(self, status: u16, body: &Value) -> Self {
        self.client
            .set_response(&chat_url(), MockResponse::json(status, body));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stream_url() -> String {
    format!("{}/chat/stream", TEST_BASE_URL)
}

pub fn chat_url() -> String {
    format!("{}/chat", TEST_BASE_URL)
}

pub fn coordinator_for(mock: &MockHttpClient) -> FallbackCoordinator<MockHttpClient> {
    FallbackCoordinator::new(MakeItClient::new(mock.clone(), TEST_BASE_URL))
}
