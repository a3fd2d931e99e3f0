//! # redash-mcp
//!
//! MCP (Model Context Protocol) server for Redash.
//!
//! This crate exposes Redash queries, dashboards, widgets, visualizations and
//! data sources as tools for AI agents. It implements the MCP protocol over
//! stdin/stdout using newline-delimited JSON-RPC 2.0 and translates each tool
//! call into one or more requests against the Redash REST API.
//!
//! ## Features
//!
//! - **5 tools**: `redash_query`, `redash_dashboard`, `redash_widget`,
//!   `redash_viz`, `redash_data_sources`, each with an action discriminator
//! - **Run and wait**: `redash_query` `run` submits a saved query and polls its
//!   job until it finishes or the poll budget runs out
//! - **Chart builders**: pie, line, bar and counter visualizations from column
//!   names alone
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "redash": {
//!       "command": "/path/to/redash-mcp",
//!       "env": {
//!         "REDASH_URL": "https://redash.example.com",
//!         "REDASH_API_KEY": "..."
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use redash_mcp::{Config, HttpTransport, McpServer, RedashClient};
//!
//! let config = Config::new("https://redash.example.com", "api-key").expect("invalid config");
//! let transport = HttpTransport::new(&config).expect("failed to build HTTP client");
//! let client = RedashClient::new(transport, config.poll());
//! let mut server = McpServer::new(client);
//!
//! // Run the server (reads from stdin, writes to stdout)
//! // server.run_sync().expect("Server error");
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
mod convert;
mod error;
mod server;
mod tools;
mod transport;
pub mod viz;

pub use client::{NewQuery, RedashClient, RunOutcome};
pub use config::{Config, PollSettings};
pub use convert::{condense_results, DASHBOARD_SUMMARY_FIELDS, QUERY_SUMMARY_FIELDS};
pub use error::{McpError, Result};
pub use server::{JsonRpcRequest, JsonRpcResponse, McpServer};
pub use tools::{ToolDef, ToolRegistry};
pub use transport::{HttpTransport, Transport};
pub use viz::{Visualization, VizType};
