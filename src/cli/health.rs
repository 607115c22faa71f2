//! Health command for the MakeIt CLI.

use std::io::Write;

use color_eyre::Result;

use crate::client::MakeItClient;
use crate::error::ClientError;
use crate::traits::HttpClient;

/// Handle the --health command.
///
/// Returns whether the backend reported `ok`. A backend that cannot be
/// reached is reported as unhealthy rather than as an error.
pub async fn handle_health_command<C: HttpClient, W: Write>(
    client: &MakeItClient<C>,
    out: &mut W,
) -> Result<bool> {
    match client.health().await {
        Ok(health) if health.is_ok() => {
            writeln!(out, "{}: healthy", client.base_url())?;
            Ok(true)
        }
        Ok(health) => {
            writeln!(out, "{}: unhealthy (status: {})", client.base_url(), health.status)?;
            Ok(false)
        }
        Err(e @ ClientError::Http(_)) => {
            tracing::debug!("Health check failed: {}", e);
            writeln!(out, "{}: unreachable ({})", client.base_url(), e)?;
            Ok(false)
        }
        Err(e) => {
            writeln!(out, "{}: unhealthy ({})", client.base_url(), e)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::HttpError;
    use serde_json::json;

    #[tokio::test]
    async fn test_healthy() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://api/health",
            MockResponse::json(200, &json!({"status": "ok"})),
        );
        let mut out = Vec::new();

        let healthy = handle_health_command(&MakeItClient::new(mock, "http://api"), &mut out)
            .await
            .unwrap();

        assert!(healthy);
        assert_eq!(String::from_utf8(out).unwrap(), "http://api: healthy\n");
    }

    #[tokio::test]
    async fn test_reported_status_is_shown() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://api/health",
            MockResponse::json(200, &json!({"status": "degraded"})),
        );
        let mut out = Vec::new();

        let healthy = handle_health_command(&MakeItClient::new(mock, "http://api"), &mut out)
            .await
            .unwrap();

        assert!(!healthy);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "http://api: unhealthy (status: degraded)\n"
        );
    }

    #[tokio::test]
    async fn test_error_status_is_unhealthy() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://api/health",
            MockResponse::json(503, &json!({"status": "down"})),
        );
        let mut out = Vec::new();

        let healthy = handle_health_command(&MakeItClient::new(mock, "http://api"), &mut out)
            .await
            .unwrap();

        assert!(!healthy);
        assert!(String::from_utf8(out).unwrap().starts_with("http://api: unhealthy (Server error (503)"));
    }

    #[tokio::test]
    async fn test_unreachable_is_unhealthy() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        let mut out = Vec::new();

        let healthy = handle_health_command(&MakeItClient::new(mock, "http://api"), &mut out)
            .await
            .unwrap();

        assert!(!healthy);
        assert!(String::from_utf8(out).unwrap().contains("unreachable"));
    }
}
