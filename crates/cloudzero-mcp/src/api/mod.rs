//! CloudZero API access.
//!
//! - [`BillingApi`] is the seam the session and the tools talk through.
//! - [`CloudZeroApi`] implements it over a shared `reqwest::Client`.
//! - [`ApiRequest`] describes one call: method, path, optional body and query.

mod client;

pub use client::CloudZeroApi;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::CloudZeroError;

/// Path of the billing costs endpoint.
pub const COSTS_PATH: &str = "billing/costs";
/// Path of the billing dimensions endpoint, also used as the liveness probe.
pub const DIMENSIONS_PATH: &str = "billing/dimensions";
/// Path of the budgets endpoint.
pub const BUDGETS_PATH: &str = "budgets";
/// Path of the insights endpoint.
pub const INSIGHTS_PATH: &str = "insights";

/// A single request against the CloudZero API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL (e.g. `billing/costs`).
    pub path: String,
    /// JSON body, sent only when present.
    pub body: Option<Value>,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request with no body and no query parameters.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present.
    #[must_use]
    pub fn with_optional_query(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }
}

/// Access to the CloudZero billing API.
///
/// Implementations own one connection pool. `request` may be called
/// concurrently; `close` releases the pool and is expected to run once per
/// session.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Execute a request and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`CloudZeroError::Status`] on a 4xx/5xx response,
    /// [`CloudZeroError::Http`] on transport failure and
    /// [`CloudZeroError::Decode`] when the body is not JSON.
    async fn request(&self, request: ApiRequest) -> Result<Value, CloudZeroError>;

    /// Release the underlying connection.
    fn close(&self);
}
