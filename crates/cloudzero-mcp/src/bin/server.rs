//! CloudZero MCP Server - Exposes CloudZero billing data via Model Context Protocol.

#![warn(clippy::pedantic)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use cloudzero_mcp::{BillingTools, Config, McpServer, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries JSON-RPC.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    let session = Session::open(&config)
        .await
        .context("Failed to start CloudZero session")?;
    info!(base_url = %config.base_url, "CloudZero MCP server ready");

    let server = Arc::new(McpServer::new(BillingTools::new(session.api())));
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let result = tokio::select! {
        result = server.serve(stdin, stdout) => result.context("stdio transport failed"),
        () = async { tokio::signal::ctrl_c().await.ok(); } => {
            info!("Received Ctrl-C, shutting down");
            Ok(())
        }
    };

    session.end();
    result
}
