#![allow(clippy::doc_markdown)] // Allow brand names like CloudZero without backticks
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

//! CloudZero billing API as an MCP server.
//!
//! The crate exposes four tools and one prompt to an MCP host:
//!
//! - **get_costs** - `GET billing/costs`, optional `start_date` / `end_date`
//! - **get_dimensions** - `GET billing/dimensions`
//! - **list_budgets** - `GET budgets`
//! - **list_insights** - `GET insights`
//! - **analyze_costs** prompt - cost analysis instructions for a period
//!
//! Responses are CloudZero's JSON, passed through unchanged. There is no
//! retry, paging or caching.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloudzero_mcp::{BillingTools, Config, CostQuery, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = Session::open(&Config::from_env()).await?;
//!     let tools = BillingTools::new(session.api());
//!
//!     let costs = tools.get_costs(&CostQuery {
//!         start_date: Some("2024-01-01".to_string()),
//!         end_date: Some("2024-01-31".to_string()),
//!     }).await?;
//!     println!("{costs:#}");
//!
//!     session.end();
//!     Ok(())
//! }
//! ```
//!
//! ## Session lifecycle
//!
//! [`Session::start`] probes `billing/dimensions` once. If the probe fails the
//! connection is released and the error returned; no retry happens. A started
//! session releases the connection exactly once, through [`Session::end`] or
//! on drop.

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prompts;
pub mod session;
pub mod tools;

pub use api::{ApiRequest, BillingApi, CloudZeroApi};
pub use config::Config;
pub use error::CloudZeroError;
pub use mcp::McpServer;
pub use session::Session;
pub use tools::{BillingTools, CostQuery};
