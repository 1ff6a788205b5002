//! Prompt templates exposed over MCP.

use serde_json::{json, Value};

use crate::error::CloudZeroError;

/// Name of the cost analysis prompt.
pub const ANALYZE_COSTS: &str = "analyze_costs";

const ANALYZE_COSTS_DESCRIPTION: &str = "Create a cost analysis prompt for a specific period";

/// Build the cost analysis prompt for `period`.
#[must_use]
pub fn analyze_costs(period: &str) -> String {
    format!(
        "Please analyze the costs for {period} and provide insights on:
1. Overall spending patterns
2. Major cost centers
3. Potential cost optimization opportunities
4. Budget compliance"
    )
}

/// Prompt descriptors for `prompts/list`.
pub fn prompt_definitions() -> Value {
    json!({
        "prompts": [
            {
                "name": ANALYZE_COSTS,
                "description": ANALYZE_COSTS_DESCRIPTION,
                "arguments": [
                    {
                        "name": "period",
                        "description": "Billing period to analyze (e.g. 'January 2024')",
                        "required": true
                    }
                ]
            }
        ]
    })
}

/// Render a prompt for `prompts/get`.
///
/// # Errors
///
/// Returns [`CloudZeroError::InvalidArgument`] for an unknown prompt or a
/// missing `period`.
pub fn get_prompt(name: &str, arguments: &Value) -> Result<Value, CloudZeroError> {
    if name != ANALYZE_COSTS {
        return Err(CloudZeroError::InvalidArgument(format!(
            "Unknown prompt: {name}"
        )));
    }

    let period = arguments
        .get("period")
        .and_then(Value::as_str)
        .ok_or_else(|| CloudZeroError::InvalidArgument("Missing 'period' argument".to_string()))?;

    Ok(json!({
        "description": ANALYZE_COSTS_DESCRIPTION,
        "messages": [
            {
                "role": "user",
                "content": {
                    "type": "text",
                    "text": analyze_costs(period)
                }
            }
        ]
    }))
}
