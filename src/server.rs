use rmcp::ServiceExt;
use rmcp::transport::{sse_server::SseServer, stdio};
use tracing_subscriber::{self, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::mcp::HexdocsSearch;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into())
}

// start sse server
pub async fn start_sse_server(addr: &str, config: Config) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let service = HexdocsSearch::from_config(&config)?;
    let ct = SseServer::serve(addr.parse()?)
        .await?
        .with_service(move || service.clone());

    tracing::info!("Serving hexdocs search over SSE on {}", addr);
    tokio::signal::ctrl_c().await?;
    ct.cancel();
    Ok(())
}

// start stdio server
pub async fn start_stdio_server(config: Config) -> anyhow::Result<()> {
    // stdout carries protocol frames, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        registry = %config.registry_url,
        search = %config.search_url,
        "Starting MCP server"
    );

    let service = HexdocsSearch::from_config(&config)?
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
