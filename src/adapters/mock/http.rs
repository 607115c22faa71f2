//! Mock HTTP client for testing.
//!
//! Responses are scripted per URL. Streaming responses are a list of chunks
//! optionally followed by a mid-stream failure or an endless stall, which is
//! enough to drive every branch of the fallback coordinator.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
    /// Whether the request asked for a streaming body
    pub streaming: bool,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail before any response is received
    Error(HttpError),
    /// Stream these chunks, then close cleanly
    Stream(Vec<Bytes>),
    /// Stream these chunks, then fail mid-body
    StreamThenError(Vec<Bytes>, HttpError),
    /// Stream these chunks, then never produce anything again
    StreamThenStall(Vec<Bytes>),
}

impl MockResponse {
    /// Buffered JSON response with the given status.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(value.to_string())))
    }

    /// Buffered plain-text response with the given status.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.into())))
    }

    /// Stream made of string chunks.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(
            chunks
                .into_iter()
                .map(|chunk| Bytes::from(chunk.into()))
                .collect(),
        )
    }
}

/// Mock HTTP client for testing.
///
/// Clones share configured responses and recorded requests, so a test can
/// hand one clone to the code under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL (exact match first, then longest prefix)
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Number of streams handed out and since dropped
    released: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL or URL prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Recorded requests whose URL ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|request| request.url.ends_with(suffix))
            .cloned()
            .collect()
    }

    /// Number of streams from `post_stream` that have been dropped.
    pub fn streams_released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn record_request(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<String>,
        streaming: bool,
    ) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
            streaming,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let longest_prefix = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if longest_prefix.is_some() {
            return longest_prefix;
        }

        lock(&self.default_response).clone()
    }

    fn buffered(&self, url: &str) -> Result<Response, HttpError> {
        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl Stream<Item = Result<Bytes, HttpError>> {
    stream::iter(chunks.into_iter().map(Ok))
}

/// Counts itself as released when dropped.
struct ReleaseTracked {
    inner: ByteStream,
    released: Arc<AtomicUsize>,
}

impl Stream for ReleaseTracked {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for ReleaseTracked {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None, false);
        self.buffered(url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()), false);
        self.buffered(url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()), true);

        let inner: ByteStream = match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => Box::pin(chunk_stream(chunks)),
            Some(MockResponse::StreamThenError(chunks, err)) => Box::pin(
                chunk_stream(chunks).chain(stream::once(async move { Err(err) })),
            ),
            Some(MockResponse::StreamThenStall(chunks)) => {
                Box::pin(chunk_stream(chunks).chain(stream::pending()))
            }
            Some(MockResponse::Error(err)) => return Err(err),
            Some(MockResponse::Success(response)) if !response.is_success() => {
                return Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text_lossy(),
                });
            }
            Some(MockResponse::Success(_)) => {
                return Err(HttpError::Other(
                    "Non-stream response on stream request".to_string(),
                ));
            }
            None => {
                return Err(HttpError::Other(format!("No mock response for URL: {}", url)));
            }
        };

        Ok(Box::pin(ReleaseTracked {
            inner,
            released: Arc::clone(&self.released),
        }))
    }
}
