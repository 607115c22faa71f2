//! Origami crease patterns in the FOLD file format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Edge assignment for a mountain fold.
pub const MOUNTAIN: &str = "M";
/// Edge assignment for a valley fold.
pub const VALLEY: &str = "V";

/// One row of `GET /fold/models`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoldModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining index fields (file name, difficulty, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FoldModelInfo {
    /// Display name, falling back to the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A FOLD document as served by `GET /fold/{id}`.
///
/// Only the geometry fields are typed; everything else the file carries is
/// kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FoldModel {
    #[serde(default)]
    pub vertices_coords: Vec<Vec<f64>>,
    #[serde(default)]
    pub edges_vertices: Vec<Vec<usize>>,
    /// One of `B`, `M`, `V`, `F`, `U`, `C` per edge
    #[serde(default)]
    pub edges_assignment: Vec<String>,
    /// Index entry the backend attaches to the document
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<FoldModelInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FoldModel {
    /// Number of edges with the given assignment.
    pub fn count_assigned(&self, assignment: &str) -> usize {
        self.edges_assignment
            .iter()
            .filter(|a| a.as_str() == assignment)
            .count()
    }

    pub fn summary(&self, model_id: &str) -> String {
        let name = self
            .meta
            .as_ref()
            .map(FoldModelInfo::label)
            .unwrap_or(model_id);
        format!(
            "{}: {} vertices, {} edges, {} mountain and {} valley folds",
            name,
            self.vertices_coords.len(),
            self.edges_vertices.len(),
            self.count_assigned(MOUNTAIN),
            self.count_assigned(VALLEY)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fold_model_keeps_unknown_fields() {
        let model: FoldModel = serde_json::from_value(json!({
            "file_spec": 1.1,
            "vertices_coords": [[0, 0], [1, 0], [1, 1], [0, 1]],
            "edges_vertices": [[0, 1], [1, 2], [2, 3], [3, 0], [0, 2]],
            "edges_assignment": ["B", "B", "B", "B", "V"],
            "_meta": {"id": "diagonal", "name": "Diagonal fold", "file": "diagonal.fold"}
        }))
        .unwrap();

        assert_eq!(model.count_assigned(VALLEY), 1);
        assert_eq!(model.extra["file_spec"], 1.1);
        assert_eq!(model.meta.as_ref().unwrap().extra["file"], "diagonal.fold");
        assert_eq!(
            model.summary("diagonal"),
            "Diagonal fold: 4 vertices, 5 edges, 0 mountain and 1 valley folds"
        );
    }

    #[test]
    fn test_summary_without_meta_uses_id() {
        let model = FoldModel::default();
        assert_eq!(
            model.summary("crane"),
            "crane: 0 vertices, 0 edges, 0 mountain and 0 valley folds"
        );
    }
}
