use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use hexdocs_mcp::config::{Config, DEFAULT_REGISTRY_URL, DEFAULT_SEARCH_URL};
use hexdocs_mcp::server;

#[derive(Parser, Debug)]
#[command(version, about = "Hexdocs Search MCP Server")]
struct Cli {
    /// Type of server to run
    #[arg(short, long, value_enum, default_value_t = ServerType::Stdio)]
    server_type: ServerType,

    /// Address for the SSE server
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: String,

    /// Base URL of the hex.pm package API
    #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// URL of the hexdocs search index
    #[arg(long, default_value = DEFAULT_SEARCH_URL)]
    search_url: String,

    /// Timeout for each package version lookup, in seconds
    #[arg(long, default_value_t = 10)]
    lookup_timeout_secs: u64,

    /// Timeout for the documentation search request, in seconds
    #[arg(long, default_value_t = 15)]
    search_timeout_secs: u64,

    /// Maximum number of package lookups in flight per search
    #[arg(long, default_value_t = 16)]
    max_concurrent_lookups: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ServerType {
    /// Start an SSE server
    Sse,
    /// Start a stdio server
    Stdio,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let config = Config::new(&self.registry_url, &self.search_url)?
            .with_lookup_timeout(Duration::from_secs(self.lookup_timeout_secs))?
            .with_search_timeout(Duration::from_secs(self.search_timeout_secs))?
            .with_max_concurrent_lookups(self.max_concurrent_lookups)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.server_type {
        ServerType::Sse => {
            println!("Starting SSE server on {}", cli.address);
            server::start_sse_server(&cli.address, config).await?;
        },
        ServerType::Stdio => {
            server::start_stdio_server(config).await?;
        },
    }

    Ok(())
}
