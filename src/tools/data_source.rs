//! Data source listing.
//!
//! Tool: redash_data_sources

use serde_json::{Map, Value as JsonValue};

use crate::client::RedashClient;
use crate::error::Result;
use crate::schema;
use crate::tools::ToolDef;
use crate::transport::Transport;

/// Tool name.
pub const TOOL: &str = "redash_data_sources";

/// Get the data source tool definition.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        TOOL,
        "List all available data sources",
        schema!(object {}),
    )]
}

/// Dispatch a data source tool call. Takes no arguments.
pub fn dispatch<T: Transport>(
    client: &RedashClient<T>,
    _args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    client.data_sources()
}
