//! HTTP plumbing shared by the hosted-backend adapters.

use crate::error::BackendError;
use migrent_core::BackendConfig;
use reqwest::{Method, RequestBuilder, Response, StatusCode};

/// Client for one hosted project: base URL, anon key, pooled connections.
#[derive(Clone)]
pub struct HostedClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for HostedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HostedClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            anon_key: anon_key.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let url = config
            .base_url()
            .ok_or_else(|| BackendError::NotConfigured("backend.url is not set".to_string()))?;
        let anon_key = config.get_anon_key().ok_or_else(|| {
            BackendError::NotConfigured("backend.anon_key or anon_key_env is not set".to_string())
        })?;
        Ok(Self::new(url, anon_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request against `path` with the project key, authorized as `bearer`
    /// or, without one, as the anonymous role.
    pub(crate) fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }
}

/// Path of a table query on the REST endpoint.
pub(crate) fn rest_path(table: &str, query: &str) -> String {
    format!("/rest/v1/{}?{}", table, query)
}

/// `column=eq.value` filter with the value percent-encoded.
pub(crate) fn eq_filter(column: &str, value: &str) -> String {
    format!("{}=eq.{}", column, urlencoding::encode(value))
}

/// Pass successful responses through; map failures onto [`BackendError`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::CONFLICT => BackendError::Conflict(message),
        _ => BackendError::http(status.as_u16(), message),
    })
}

/// First human-readable message in a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_keys() {
        assert_eq!(
            error_message(r#"{"detail":"You have already reported this."}"#).as_deref(),
            Some("You have already reported this.")
        );
        assert_eq!(
            error_message(r#"{"code":"PGRST116","message":"no rows"}"#).as_deref(),
            Some("no rows")
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_eq_filter_encodes_value() {
        assert_eq!(eq_filter("id", "u 1&x"), "id=eq.u%201%26x");
        assert_eq!(rest_path("profiles", "select=role"), "/rest/v1/profiles?select=role");
    }

    #[test]
    fn test_from_config_requires_url_and_key() {
        let config = BackendConfig::default();
        assert!(matches!(
            HostedClient::from_config(&config),
            Err(BackendError::NotConfigured(_))
        ));

        let config = BackendConfig {
            url: Some("https://abc.example.co/".to_string()),
            anon_key: Some("anon".to_string()),
            ..Default::default()
        };
        let client = HostedClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://abc.example.co");
    }
}
