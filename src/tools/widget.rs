//! Dashboard widget tool.
//!
//! Tool: redash_widget
//! Actions: add, delete

use serde_json::{json, Map, Value as JsonValue};

use crate::client::RedashClient;
use crate::convert::{get_optional_u64_arg, get_string_arg, get_u64_arg};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::transport::Transport;

/// Tool name.
pub const TOOL: &str = "redash_widget";

/// Get the widget tool definition.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        TOOL,
        "Manage dashboard widgets. Actions: add, delete",
        schema!(object {
            required: { "action": ["add", "delete"] },
            optional: {
                "id": integer => "Widget ID (for delete)",
                "dashboard_id": integer => "Dashboard ID (for add)",
                "viz_id": integer => "Visualization ID (for add)",
                "width": integer = 1 => "Widget width (for add)"
            }
        }),
    )]
}

/// Dispatch a widget tool call.
pub fn dispatch<T: Transport>(
    client: &RedashClient<T>,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let action = get_string_arg(&args, "action")?;

    match action.as_str() {
        "add" => {
            let dashboard_id = get_u64_arg(&args, "dashboard_id")?;
            let viz_id = get_u64_arg(&args, "viz_id")?;
            let width = get_optional_u64_arg(&args, "width")?.unwrap_or(1);
            client.add_widget(dashboard_id, viz_id, width)
        }
        "delete" => {
            client.delete_widget(get_u64_arg(&args, "id")?)?;
            Ok(json!({ "success": true }))
        }
        _ => Err(McpError::UnknownAction(action)),
    }
}
