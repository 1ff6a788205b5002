//! CloudZero REST API client.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{ApiRequest, BillingApi};
use crate::config::{Config, CLOUDZERO_API_BASE};
use crate::error::CloudZeroError;

/// CloudZero API client.
///
/// Holds the bearer headers and a single `reqwest::Client`. The client lives
/// in a slot that [`BillingApi::close`] empties, so the connection pool is
/// dropped exactly once and later requests fail with
/// [`CloudZeroError::Closed`] instead of reconnecting.
#[derive(Debug)]
pub struct CloudZeroApi {
    base_url: String,
    headers: HeaderMap,
    connection: Mutex<Option<Client>>,
}

impl CloudZeroApi {
    /// Create a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be used as a header value or the
    /// HTTP client fails to build.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self, CloudZeroError> {
        Self::with_base_url(api_key, CLOUDZERO_API_BASE)
    }

    /// Create a client against an arbitrary base URL.
    ///
    /// # Errors
    ///
    /// Same as [`CloudZeroApi::new`].
    pub fn with_base_url(
        api_key: impl AsRef<str>,
        base_url: impl Into<String>,
    ) -> Result<Self, CloudZeroError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.as_ref()))
            .map_err(|e| CloudZeroError::InvalidArgument(format!("API key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("cloudzero-mcp/", env!("CARGO_PKG_VERSION")))
            // A 3xx is surfaced as a status error, never followed.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(CloudZeroError::Http)?;

        Ok(Self {
            base_url: base_url.into(),
            headers,
            connection: Mutex::new(Some(client)),
        })
    }

    /// Create a client from server configuration.
    ///
    /// # Errors
    ///
    /// Same as [`CloudZeroApi::new`].
    pub fn from_config(config: &Config) -> Result<Self, CloudZeroError> {
        Self::with_base_url(&config.api_key, config.base_url.clone())
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the connection is still held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Client>> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the pooled client; `reqwest::Client` is an `Arc` handle, so
    /// the lock is never held across an await.
    fn connection(&self) -> Option<Client> {
        self.slot().as_ref().cloned()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl BillingApi for CloudZeroApi {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn request(&self, request: ApiRequest) -> Result<Value, CloudZeroError> {
        let client = self.connection().ok_or(CloudZeroError::Closed)?;
        let url = self.url(&request.path);
        debug!(url = %url, "Making CloudZero API request");

        let mut builder = client
            .request(request.method, &url)
            .headers(self.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CloudZeroError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(CloudZeroError::Decode)
    }

    fn close(&self) {
        if self.slot().take().is_some() {
            info!("Closed CloudZero API connection");
        } else {
            warn!("CloudZero API connection was already closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DIMENSIONS_PATH, INSIGHTS_PATH};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_joins_with_single_slash() {
        let api = CloudZeroApi::with_base_url("key", "https://example.test/v2/").unwrap();
        assert_eq!(
            api.url("/billing/costs"),
            "https://example.test/v2/billing/costs"
        );
        assert_eq!(api.url("budgets"), "https://example.test/v2/budgets");
    }

    #[test]
    fn test_default_base_url() {
        let api = CloudZeroApi::new("").unwrap();
        assert_eq!(api.base_url(), "https://api.cloudzero.com/v2");
        assert!(api.is_open());
    }

    #[test]
    fn test_key_with_newline_is_rejected() {
        let result = CloudZeroApi::new("bad\nkey");
        assert!(matches!(result, Err(CloudZeroError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_request_returns_json_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/billing/dimensions"))
            .and(header("authorization", "Bearer cz-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"dimensions": []}"#))
            .expect(1)
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let value = api.request(ApiRequest::get(DIMENSIONS_PATH)).await.unwrap();
        assert_eq!(value, json!({"dimensions": []}));
    }

    #[tokio::test]
    async fn test_request_returns_list_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/insights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "i-1"}])))
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let value = api.request(ApiRequest::get(INSIGHTS_PATH)).await.unwrap();
        assert_eq!(value, json!([{"id": "i-1"}]));
    }

    #[tokio::test]
    async fn test_forbidden_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(1)
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let err = api
            .request(ApiRequest::get(DIMENSIONS_PATH))
            .await
            .unwrap_err();
        match err {
            CloudZeroError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not-json"))
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let err = api
            .request(ApiRequest::get(DIMENSIONS_PATH))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudZeroError::Decode(_)));
    }

    #[tokio::test]
    async fn test_body_and_query_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/budgets"))
            .and(wiremock::matchers::query_param("dry_run", "true"))
            .and(wiremock::matchers::body_json(json!({"name": "q1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let request = ApiRequest::new(reqwest::Method::POST, "budgets")
            .with_body(json!({"name": "q1"}))
            .with_query("dry_run", "true");
        let value = api.request(request).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_request_after_close_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        api.request(ApiRequest::get(DIMENSIONS_PATH)).await.unwrap();
        api.close();
        assert!(!api.is_open());

        let err = api
            .request(ApiRequest::get(DIMENSIONS_PATH))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudZeroError::Closed));
        // MockServer verifies `expect(1)` on drop.
    }

    #[tokio::test]
    async fn test_redirect_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/budgets"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/moved", server.uri()).as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"moved": true})))
            .expect(0)
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let err = api
            .request(ApiRequest::get(crate::api::BUDGETS_PATH))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudZeroError::Status { status: 302, .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\"\xff\"".to_vec()))
            .mount(&server)
            .await;

        let api = CloudZeroApi::with_base_url("cz-key", server.uri()).unwrap();
        let err = api
            .request(ApiRequest::get(DIMENSIONS_PATH))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudZeroError::Decode(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let api = CloudZeroApi::new("cz-secret-key").unwrap();
        assert!(!format!("{api:?}").contains("cz-secret-key"));
    }

    #[test]
    fn test_second_close_is_noop() {
        let api = CloudZeroApi::new("cz-key").unwrap();
        api.close();
        api.close();
        assert!(!api.is_open());
    }
}
