use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role used for user-authored history entries.
pub const ROLE_USER: &str = "user";
/// Role used for assistant-authored history entries.
pub const ROLE_ASSISTANT: &str = "assistant";

/// One entry of the conversation history.
///
/// The backend owns the history: it returns the updated list with every
/// terminal payload and the client sends it back unchanged with the next
/// turn. Fields other than `role` and `content` are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default)]
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HistoryEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Value::String(content.into()),
            extra: Map::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }

    /// Content as plain text, when the backend stored it as a string.
    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }
}

/// Request body shared by the streaming and the synchronous chat endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The user's message for this turn
    pub message: String,
    /// History returned by the previous turn
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
    /// Free-form project facts (material, tools, budget, ...)
    #[serde(default = "empty_object")]
    pub project_context: Value,
    /// Tutorial state returned by the previous turn, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_data: Option<Value>,
    /// Image generated in an earlier turn, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ChatRequest {
    /// Create a request for the first turn of a conversation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_history: Vec::new(),
            project_context: empty_object(),
            tutorial_data: None,
            generated_image: None,
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.conversation_history = history;
        self
    }

    pub fn with_project_context(mut self, context: Value) -> Self {
        self.project_context = context;
        self
    }

    pub fn with_tutorial_data(mut self, tutorial_data: Option<Value>) -> Self {
        self.tutorial_data = tutorial_data;
        self
    }

    pub fn with_generated_image(mut self, image: Option<String>) -> Self {
        self.generated_image = image;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_serialization_omits_absent_optionals() {
        let request = ChatRequest::new("How do I fold a crane?");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "How do I fold a crane?",
                "conversation_history": [],
                "project_context": {}
            })
        );
    }

    #[test]
    fn test_chat_request_with_history_and_tutorial() {
        let request = ChatRequest::new("next step")
            .with_history(vec![
                HistoryEntry::user("fold a crane"),
                HistoryEntry::assistant("Sure!"),
            ])
            .with_project_context(json!({"material": "paper"}))
            .with_tutorial_data(Some(json!({"current_step": 2})));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["conversation_history"][0]["role"], "user");
        assert_eq!(value["conversation_history"][1]["content"], "Sure!");
        assert_eq!(value["project_context"]["material"], "paper");
        assert_eq!(value["tutorial_data"]["current_step"], 2);
        assert!(value.get("generated_image").is_none());
    }

    #[test]
    fn test_history_entry_keeps_unknown_fields() {
        let raw = json!({"role": "assistant", "content": "hi", "node": "chat_node"});
        let entry: HistoryEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.text(), Some("hi"));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_history_entry_non_string_content() {
        let raw = json!({"role": "user", "content": [{"type": "text", "text": "hi"}]});
        let entry: HistoryEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.text(), None);
    }
}
