//! Typed payloads carried by stream frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::HistoryEntry;

/// `thinking` frame: progress text from a backend node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThinkingPayload {
    pub text: String,
    /// Backend node that produced the status (e.g. "tutorial_gen_node")
    #[serde(default)]
    pub node: Option<String>,
}

/// `token` frame: an increment of generated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPayload {
    pub text: String,
}

/// `done` frame, and the body of the synchronous chat endpoint.
///
/// `response` is the canonical message to display. It supersedes whatever
/// token text was accumulated during the stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonePayload {
    pub response: String,
    /// Backend node that handled the turn (e.g. "chat_node")
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    pub conversation_history: Vec<HistoryEntry>,
    /// Human-facing status label; only the synchronous endpoint sends it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Retrieved reference rows backing the answer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Value>,
}

impl DonePayload {
    /// Whether the turn produced or advanced a tutorial.
    pub fn has_tutorial(&self) -> bool {
        matches!(&self.tutorial_data, Some(data) if !data.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thinking_payload_node_optional() {
        let payload: ThinkingPayload =
            serde_json::from_value(json!({"text": "Elfy is thinking..."})).unwrap();
        assert_eq!(payload.node, None);

        let payload: ThinkingPayload =
            serde_json::from_value(json!({"text": "Crafting", "node": "tutorial_gen_node"}))
                .unwrap();
        assert_eq!(payload.node.as_deref(), Some("tutorial_gen_node"));
    }

    #[test]
    fn test_token_payload_requires_text() {
        assert!(serde_json::from_value::<TokenPayload>(json!({"delta": "x"})).is_err());
    }

    #[test]
    fn test_done_payload_minimal() {
        let payload: DonePayload = serde_json::from_value(json!({
            "response": "Here is your tutorial",
            "action": "tutorial_gen_node",
            "conversation_history": [{"role": "user", "content": "crane"}]
        }))
        .unwrap();

        assert_eq!(payload.response, "Here is your tutorial");
        assert!(!payload.has_tutorial());
        assert!(payload.sources.is_empty());
        assert_eq!(payload.conversation_history.len(), 1);
    }

    #[test]
    fn test_done_payload_synchronous_body() {
        let payload: DonePayload = serde_json::from_value(json!({
            "response": "Done",
            "action": "chat_node",
            "status_text": "Elfy is thinking...",
            "generated_image": null,
            "tutorial_data": {"steps": []},
            "sources": [{"content": "Fold in half", "similarity": 0.82}],
            "conversation_history": []
        }))
        .unwrap();

        assert!(payload.has_tutorial());
        assert_eq!(payload.status_text.as_deref(), Some("Elfy is thinking..."));
        assert_eq!(payload.sources.len(), 1);
        assert_eq!(payload.generated_image, None);
    }

    #[test]
    fn test_done_payload_missing_history_rejected() {
        let result = serde_json::from_value::<DonePayload>(json!({
            "response": "x",
            "action": "chat_node"
        }));
        assert!(result.is_err());
    }
}
