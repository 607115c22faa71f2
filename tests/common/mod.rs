//! Common test utilities for integration tests.
//!
//! Frame builders for the streaming wire format, plus mock backend
//! configurations.
//!
//! # Example
//!
//! ```ignore
//! use common::{done_frame, token_frame, MockBackendBuilder};
//!
//! let backend = MockBackendBuilder::new()
//!     .with_stream([token_frame("Hi"), done_frame("Hi")])
//!     .build();
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use serde_json::{json, Value};

/// Base URL used by mock-backed clients.
pub const TEST_BASE_URL: &str = "http://makeit.test";

/// One `event:`/`data:` frame.
pub fn frame(event_type: &str, payload: &Value) -> String {
    format!("event: {}\ndata: {}\n", event_type, payload)
}

pub fn thinking_frame(text: &str, node: &str) -> String {
    frame("thinking", &json!({"text": text, "node": node}))
}

pub fn token_frame(text: &str) -> String {
    frame("token", &json!({"text": text}))
}

pub fn done_payload(response: &str) -> Value {
    json!({
        "response": response,
        "action": "chat_node",
        "conversation_history": [
            {"role": "user", "content": "How do I start a birdhouse?"},
            {"role": "assistant", "content": response}
        ]
    })
}

pub fn done_frame(response: &str) -> String {
    frame("done", &done_payload(response))
}

/// A typical full reply: status, tokens, terminal frame.
pub fn full_reply() -> String {
    [
        thinking_frame("Reading your project", "router"),
        thinking_frame("Drafting a plan", "chat_node"),
        token_frame("Start with "),
        token_frame("a 1×6 pine board – ½\" thick."),
        done_frame("Start with a 1×6 pine board – ½\" thick."),
    ]
    .concat()
}
