//! Server configuration.
//!
//! Values come from command-line flags with environment fallbacks. The
//! binary loads a `.env` file before parsing, so either source works.

use clap::Parser;

/// Production CloudZero API base URL.
pub const CLOUDZERO_API_BASE: &str = "https://api.cloudzero.com/v2";

/// Environment variable holding the bearer token.
pub const ENV_API_KEY: &str = "CLOUDZERO_API_KEY";

/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "CLOUDZERO_API_BASE_URL";

/// CloudZero MCP server configuration.
#[derive(Clone, Parser)]
#[command(name = "cloudzero-mcp", version, about = "CloudZero billing API as MCP tools")]
pub struct Config {
    /// CloudZero API key. An empty key is accepted; the startup probe rejects it.
    #[arg(long, env = ENV_API_KEY, default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the CloudZero API.
    #[arg(long, env = ENV_BASE_URL, default_value = CLOUDZERO_API_BASE)]
    pub base_url: String,
}

impl Config {
    /// Build a configuration from environment variables only.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(ENV_API_KEY).unwrap_or_default(),
            base_url: std::env::var(ENV_BASE_URL)
                .unwrap_or_else(|_| CLOUDZERO_API_BASE.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: CLOUDZERO_API_BASE.to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Config")
            .field("api_key", &api_key)
            .field("base_url", &self.base_url)
            .finish()
    }
}
