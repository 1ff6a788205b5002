//! Billing tools exposed over MCP.
//!
//! Each tool checks that a client is in scope and forwards to a fixed
//! endpoint; responses come back exactly as CloudZero sent them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::{
    ApiRequest, BillingApi, BUDGETS_PATH, COSTS_PATH, DIMENSIONS_PATH, INSIGHTS_PATH,
};
use crate::error::CloudZeroError;

/// Arguments of the `get_costs` tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostQuery {
    /// Start date for the cost query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date for the cost query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// The billing tools, bound to an optional API client.
#[derive(Clone, Default)]
pub struct BillingTools {
    api: Option<Arc<dyn BillingApi>>,
}

impl BillingTools {
    /// Bind the tools to a client.
    pub fn new(api: Arc<dyn BillingApi>) -> Self {
        Self { api: Some(api) }
    }

    /// Tools with no client; every call fails with `NotInitialized`.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self { api: None }
    }

    fn api(&self) -> Result<&Arc<dyn BillingApi>, CloudZeroError> {
        self.api.as_ref().ok_or(CloudZeroError::NotInitialized)
    }

    /// Get billing costs for an optional date range.
    pub async fn get_costs(&self, query: &CostQuery) -> Result<Value, CloudZeroError> {
        let api = self.api()?;
        let request = ApiRequest::get(COSTS_PATH)
            .with_optional_query("start_date", query.start_date.as_deref())
            .with_optional_query("end_date", query.end_date.as_deref());
        api.request(request).await
    }

    /// Get billing dimensions.
    pub async fn get_dimensions(&self) -> Result<Value, CloudZeroError> {
        self.api()?.request(ApiRequest::get(DIMENSIONS_PATH)).await
    }

    /// List all budgets.
    pub async fn list_budgets(&self) -> Result<Value, CloudZeroError> {
        self.api()?.request(ApiRequest::get(BUDGETS_PATH)).await
    }

    /// List all insights.
    pub async fn list_insights(&self) -> Result<Value, CloudZeroError> {
        self.api()?.request(ApiRequest::get(INSIGHTS_PATH)).await
    }

    /// Dispatch a tool call by name.
    ///
    /// # Errors
    ///
    /// Returns [`CloudZeroError::InvalidArgument`] for unknown tools or
    /// malformed arguments, otherwise whatever the tool returns.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, CloudZeroError> {
        debug!(tool = name, "Calling tool");
        match name {
            "get_costs" => {
                let arguments = if arguments.is_null() {
                    json!({})
                } else {
                    arguments
                };
                let query: CostQuery = serde_json::from_value(arguments)
                    .map_err(|e| CloudZeroError::InvalidArgument(e.to_string()))?;
                self.get_costs(&query).await
            }
            "get_dimensions" => self.get_dimensions().await,
            "list_budgets" => self.list_budgets().await,
            "list_insights" => self.list_insights().await,
            _ => Err(CloudZeroError::InvalidArgument(format!(
                "Unknown tool: {name}"
            ))),
        }
    }
}

impl std::fmt::Debug for BillingTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingTools")
            .field("initialized", &self.api.is_some())
            .finish()
    }
}

/// Tool schemas for `tools/list`.
pub fn tool_definitions() -> Value {
    json!({
        "tools": [
            {
                "name": "get_costs",
                "description": "Get billing costs for a specified date range",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "start_date": {
                            "type": "string",
                            "description": "Start date for cost query"
                        },
                        "end_date": {
                            "type": "string",
                            "description": "End date for cost query"
                        }
                    }
                }
            },
            {
                "name": "get_dimensions",
                "description": "Get billing dimensions",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_budgets",
                "description": "List all budgets",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_insights",
                "description": "List all insights",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    })
}
