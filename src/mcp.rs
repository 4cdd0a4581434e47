//! MCP tool exposing hexdocs search.
//!
//! The server registers a single `search` tool. Each call resolves the
//! requested packages to their latest releases on hex.pm, searches the
//! hexdocs index within those releases and answers with one text block.
//!
//! # Example
//! ```no_run
//! use hexdocs_mcp::config::Config;
//! use hexdocs_mcp::mcp::HexdocsSearch;
//! use rmcp::{ServiceExt, transport::stdio};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let server = HexdocsSearch::from_config(&Config::default())?;
//!     server.serve(stdio()).await?.waiting().await?;
//!     Ok(())
//! }
//! ```

use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities};
use rmcp::{ServerHandler, model::ServerInfo, tool};
use rmcp::{schemars, model::{IntoContents, Content}};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::format::format_results;
use crate::search::{SearchClient, SearchError};

pub const SERVER_NAME: &str = "Hexdocs search";

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema, PartialEq, Eq)]
pub struct SearchArgs {
    #[schemars(description = "Hex packages to search in, e.g. [\"ecto\", \"phoenix\"]. The latest release of each is searched.")]
    pub packages: Vec<String>,
    #[schemars(description = "Term to search for in documentation titles and bodies")]
    pub query: String,
}

/// Rendered search results, returned as a single text content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutput {
    pub text: String,
}

impl IntoContents for SearchOutput {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(self.text)]
    }
}

#[derive(Debug, Clone)]
pub struct HexdocsSearch {
    client: Arc<SearchClient>,
}

#[tool(tool_box)]
impl HexdocsSearch {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Ok(Self::new(SearchClient::from_config(config)?))
    }

    /// Search failures are reported in the text, never as a protocol error.
    #[tool(description = "Searches documentation from any existing elixir package. Expects a list of packages to search on, and a term to search for.")]
    async fn search(
        &self,
        #[tool(aggr)]
        args: SearchArgs,
    ) -> SearchOutput {
        let results = self
            .client
            .search(&args.query, &args.packages)
            .await
            .inspect_err(|err| tracing::warn!("Search for {:?} failed: {}", args.query, err))
            .ok();

        SearchOutput {
            text: format_results(results.as_ref()),
        }
    }
}

#[tool(tool_box)]
impl ServerHandler for HexdocsSearch {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "This server searches documentation of Elixir and Erlang packages published on hex.pm. \
                Use the 'search' tool with a list of package names and a search term. \
                The latest release of each package is searched.".to_string()
            ),
        }
    }
}
