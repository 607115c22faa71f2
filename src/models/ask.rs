//! Reference-question exchange backed by the similarity search endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskRequest {
    pub question: String,
}

/// One ranked row returned by the similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// Excerpt of the matched chunk
    pub content: String,
    pub similarity: f64,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl AskResponse {
    /// Sources ordered by descending similarity.
    pub fn ranked_sources(&self) -> Vec<&Source> {
        let mut ranked: Vec<&Source> = self.sources.iter().collect();
        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_sources() {
        let response: AskResponse = serde_json::from_str(
            r#"{
                "answer": "Use a bone folder.",
                "sources": [
                    {"content": "low", "similarity": 0.31},
                    {"content": "high", "similarity": 0.87, "metadata": {"book": "Origami"}},
                    {"content": "mid", "similarity": 0.55}
                ]
            }"#,
        )
        .unwrap();

        let ranked: Vec<&str> = response
            .ranked_sources()
            .iter()
            .map(|s| s.content.as_str())
            .collect();
        assert_eq!(ranked, vec!["high", "mid", "low"]);
        assert_eq!(response.sources[1].metadata["book"], "Origami");
    }
}
