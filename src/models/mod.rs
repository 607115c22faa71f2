mod ask;
mod fold;
mod image;
mod payloads;
mod request;

use serde::{Deserialize, Serialize};

pub use ask::{AskRequest, AskResponse, Source};
pub use fold::{FoldModel, FoldModelInfo, MOUNTAIN, VALLEY};
pub use image::{media_type_for_path, ImageRequest, ImageResponse};
pub use payloads::{DonePayload, ThinkingPayload, TokenPayload};
pub use request::{ChatRequest, HistoryEntry, ROLE_ASSISTANT, ROLE_USER};

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
