//! Tool registry and category definitions.
//!
//! Provides the infrastructure for registering and dispatching MCP tools.

pub mod dashboard;
pub mod data_source;
pub mod query;
pub mod viz;
pub mod widget;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::client::RedashClient;
use crate::error::{McpError, Result};
use crate::transport::Transport;

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "redash_query")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create a new registry with all tools registered.
    pub fn new() -> Self {
        let mut tools = Vec::new();

        tools.extend(query::tools());
        tools.extend(dashboard::tools());
        tools.extend(widget::tools());
        tools.extend(viz::tools());
        tools.extend(data_source::tools());

        Self { tools }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Dispatch a tool call to the appropriate handler.
    pub fn dispatch<T: Transport>(
        &self,
        client: &RedashClient<T>,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        debug!(tool = name, "dispatching tool call");

        match name {
            query::TOOL => query::dispatch(client, args),
            dashboard::TOOL => dashboard::dispatch(client, args),
            widget::TOOL => widget::dispatch(client, args),
            viz::TOOL => viz::dispatch(client, args),
            data_source::TOOL => data_source::dispatch(client, args),
            _ => Err(McpError::UnknownTool(name.to_string())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
///
/// Each property is `"name": type`, optionally followed by `= default` and
/// `=> "description"`. A type is one of the keywords below or a bracketed
/// list of string literals, which becomes a string enum.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt $(= $req_default:literal)? $(=> $req_desc:literal)?),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt $(= $opt_default:literal)? $(=> $opt_desc:literal)?),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), $crate::schema!(@prop $req_type $(= $req_default)? $(=> $req_desc)?));)*
        $(props.insert($opt_name.to_string(), $crate::schema!(@prop $opt_type $(= $opt_default)? $(=> $opt_desc)?));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt $(= $req_default:literal)? $(=> $req_desc:literal)?),* $(,)? }
    }) => {
        $crate::schema!(object {
            required: { $($req_name : $req_type $(= $req_default)? $(=> $req_desc)?),* },
            optional: {}
        })
    };

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // A single property: type plus optional default and description
    (@prop $ty:tt $(= $default:literal)? $(=> $desc:literal)?) => {{
        #[allow(unused_mut)]
        let mut prop = $crate::schema!(@type $ty);
        $(prop["default"] = serde_json::json!($default);)?
        $(prop["description"] = serde_json::json!($desc);)?
        prop
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type boolean) => { serde_json::json!({"type": "boolean"}) };
    (@type [$($variant:literal),* $(,)?]) => {
        serde_json::json!({"type": "string", "enum": [$($variant),*]})
    };
}
