//! MakeIt backend client.
//!
//! Builds every request the assistant sends: the streaming chat exchange, its
//! synchronous fallback, and the supplementary endpoints. Transport is
//! delegated to an [`HttpClient`], shared behind an `Arc` so clones of the
//! client can run independent sessions concurrently.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    AskRequest, AskResponse, ChatRequest, DonePayload, FoldModel, FoldModelInfo, HealthResponse,
    ImageRequest, ImageResponse,
};
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

pub const CHAT_STREAM_PATH: &str = "/chat/stream";
pub const CHAT_PATH: &str = "/chat";
pub const ASK_PATH: &str = "/ask";
pub const ANALYZE_IMAGE_PATH: &str = "/analyze-image";
pub const HEALTH_PATH: &str = "/health";
pub const FOLD_MODELS_PATH: &str = "/fold/models";
pub const FOLD_PATH: &str = "/fold";

/// Client for the MakeIt backend API.
pub struct MakeItClient<C: HttpClient = ReqwestHttpClient> {
    http: Arc<C>,
    base_url: String,
}

impl<C: HttpClient> Clone for MakeItClient<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            base_url: self.base_url.clone(),
        }
    }
}

impl<C: HttpClient> std::fmt::Debug for MakeItClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MakeItClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MakeItClient<ReqwestHttpClient> {
    /// Create a reqwest-backed client from config.
    pub fn from_config(config: &ClientConfig) -> Self {
        let http = ReqwestHttpClient::new().with_request_timeout(config.request_timeout);
        Self::new(http, config.base_url.clone())
    }
}

impl<C: HttpClient> MakeItClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self::with_shared(Arc::new(http), base_url)
    }

    /// Create a client around an HTTP client that is already shared.
    pub fn with_shared(http: Arc<C>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open the streaming chat exchange.
    ///
    /// Fails before yielding any chunk when the connection cannot be made or
    /// the server answers with a non-success status.
    pub async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, HttpError> {
        let body = serde_json::to_string(request)
            .map_err(|e| HttpError::Other(format!("Failed to encode request: {}", e)))?;

        let mut headers = json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        self.http
            .post_stream(&self.url(CHAT_STREAM_PATH), &body, &headers)
            .await
    }

    /// Synchronous chat turn. Returns the same shape a streamed `done` frame carries.
    pub async fn chat(&self, request: &ChatRequest) -> Result<DonePayload, ClientError> {
        self.post_json(CHAT_PATH, request).await
    }

    /// Ask the knowledge base a question.
    pub async fn ask(&self, question: impl Into<String>) -> Result<AskResponse, ClientError> {
        let request = AskRequest {
            question: question.into(),
        };
        self.post_json(ASK_PATH, &request).await
    }

    pub async fn analyze_image(&self, request: &ImageRequest) -> Result<ImageResponse, ClientError> {
        self.post_json(ANALYZE_IMAGE_PATH, request).await
    }

    /// Check if the backend is reachable.
    ///
    /// # Returns
    /// `true` if the health endpoint answers with a success status
    pub async fn health_check(&self) -> Result<bool, ClientError> {
        let response = self.http.get(&self.url(HEALTH_PATH), &Headers::new()).await?;
        Ok(response.is_success())
    }

    /// Fetch the status the backend reports about itself.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json(HEALTH_PATH).await
    }

    /// List the origami models the backend can serve.
    pub async fn list_fold_models(&self) -> Result<Vec<FoldModelInfo>, ClientError> {
        self.get_json(FOLD_MODELS_PATH).await
    }

    /// Fetch one FOLD document.
    ///
    /// The backend answers an unknown id with `200 {"error": ..}`; that is
    /// reported as [`ClientError::NotFound`], as is a 404.
    pub async fn get_fold(&self, model_id: &str) -> Result<FoldModel, ClientError> {
        let path = format!("{}/{}", FOLD_PATH, model_id);
        let value: Value = self
            .get_json(&path)
            .await
            .map_err(|e| not_found_on_404(e, model_id))?;

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(ClientError::NotFound {
                resource: model_id.to_string(),
                message: message.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse {
            endpoint: path,
            message: e.to_string(),
        })
    }

    /// Fetch a model rendered as an SVG document.
    pub async fn fold_svg(&self, model_id: &str) -> Result<String, ClientError> {
        let path = format!("{}/{}/svg", FOLD_PATH, model_id);
        let response = self.http.get(&self.url(&path), &Headers::new()).await?;

        if !response.is_success() {
            return Err(not_found_on_404(
                ClientError::Status {
                    status: response.status,
                    message: response.text_lossy(),
                },
                model_id,
            ));
        }

        String::from_utf8(response.body.to_vec()).map_err(|e| ClientError::InvalidResponse {
            endpoint: path,
            message: e.to_string(),
        })
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let response = self.http.get(&self.url(path), &Headers::new()).await?;
        decode_response(path, response)
    }

    async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_string(body).map_err(|e| {
            ClientError::Http(HttpError::Other(format!("Failed to encode request: {}", e)))
        })?;

        let response = self.http.post(&self.url(path), &body, &json_headers()).await?;
        decode_response(path, response)
    }
}

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

fn not_found_on_404(err: ClientError, resource: &str) -> ClientError {
    match err {
        ClientError::Status {
            status: 404,
            message,
        } => ClientError::NotFound {
            resource: resource.to_string(),
            message,
        },
        other => other,
    }
}

fn decode_response<R: DeserializeOwned>(path: &str, response: Response) -> Result<R, ClientError> {
    if !response.is_success() {
        return Err(ClientError::Status {
            status: response.status,
            message: response.text_lossy(),
        });
    }

    response.json().map_err(|e| ClientError::InvalidResponse {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}
