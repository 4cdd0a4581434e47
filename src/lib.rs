//! Hexdocs Search MCP Service
//!
//! This crate provides an MCP server with a single `search` tool that looks up
//! documentation for Elixir and Erlang packages published on hex.pm.
//!
//! # Modules
//!
//! - [`config`]: Upstream endpoints, timeouts and concurrency limits
//! - [`hex`]: Latest-version resolution against the hex.pm API
//! - [`search`]: Filtered queries against the hexdocs search index
//! - [`format`]: Plain-text rendering of search results
//! - [`mcp`]: MCP tool registration and protocol handling
//! - [`server`]: stdio and SSE transports

pub mod config;
pub mod format;
pub mod hex;
pub mod mcp;
pub mod search;
pub mod server;
