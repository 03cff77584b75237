//! chat_server: REST front door for the ClickUp bridge.
//!
//! Configuration comes from `BRIDGE_CONFIG` (YAML) and the environment; a
//! `.env` file in the working directory is loaded first.

use std::sync::Arc;

use anyhow::{Context, Result};
use clickup_bridge::api::chat_router;
use clickup_bridge::{BridgeConfig, ClickUpApi, ClickUpClient, CommandInterpreter};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,clickup_bridge=debug".into()),
        )
        .init();

    let config = Arc::new(BridgeConfig::load()?);

    let client: Arc<dyn ClickUpApi> = Arc::new(
        ClickUpClient::from_config(&config.clickup)
            .context("failed to build ClickUp HTTP client")?,
    );
    let interpreter = Arc::new(CommandInterpreter::new(client, Arc::clone(&config)));

    let app = chat_router(interpreter);

    let bind_addr = config.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("chat_server listening on {bind_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
