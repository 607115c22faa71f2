//! Client configuration.

use std::time::Duration;

/// Backend URL used when `MAKEIT_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Timeout for single-exchange calls when `MAKEIT_REQUEST_TIMEOUT_SECS` is not set.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_API_URL: &str = "MAKEIT_API_URL";
pub const ENV_CHUNK_TIMEOUT: &str = "MAKEIT_CHUNK_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "MAKEIT_REQUEST_TIMEOUT_SECS";

/// Configuration for [`crate::client::MakeItClient`] and the coordinator.
///
/// # Example
///
/// ```ignore
/// use makeit::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://127.0.0.1:8000")
///     .with_chunk_timeout(Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    /// Maximum silence between two stream chunks (None = wait forever)
    pub chunk_timeout: Option<Duration>,
    /// Timeout for buffered requests (fallback, ask, image, health)
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            chunk_timeout: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(url.into());
        self
    }

    pub fn with_chunk_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.chunk_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build config from `MAKEIT_*` environment variables.
    ///
    /// Unset variables keep their defaults. Values that do not parse are
    /// logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if url.trim().is_empty() {
                tracing::warn!("{} is empty, using {}", ENV_API_URL, DEFAULT_API_URL);
            } else {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(value) = std::env::var(ENV_CHUNK_TIMEOUT) {
            if let Some(timeout) = parse_secs(ENV_CHUNK_TIMEOUT, &value) {
                config.chunk_timeout = Some(timeout);
            }
        }

        if let Ok(value) = std::env::var(ENV_REQUEST_TIMEOUT) {
            if let Some(timeout) = parse_secs(ENV_REQUEST_TIMEOUT, &value) {
                config.request_timeout = timeout;
            }
        }

        config
    }
}

/// Parse a positive whole number of seconds.
pub fn parse_secs(name: &str, value: &str) -> Option<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => {
            tracing::warn!("Ignoring {}=0, timeout must be positive", name);
            None
        }
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(e) => {
            tracing::warn!("Ignoring invalid {}={:?}: {}", name, value, e);
            None
        }
    }
}

fn normalize_base_url(url: String) -> String {
    match url.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.chunk_timeout, None);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_client_config_builder_chain() {
        let config = ClientConfig::new()
            .with_base_url("http://backend:9000/")
            .with_chunk_timeout(Some(Duration::from_secs(15)))
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.chunk_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("X", " 30 "), Some(Duration::from_secs(30)));
        assert_eq!(parse_secs("X", "0"), None);
        assert_eq!(parse_secs("X", "-1"), None);
        assert_eq!(parse_secs("X", "soon"), None);
    }
}
