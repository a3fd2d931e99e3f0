//! Dashboard tool.
//!
//! Tool: redash_dashboard
//! Actions: list, get, create, update, publish, delete

use serde_json::{json, Map, Value as JsonValue};

use crate::client::RedashClient;
use crate::convert::{
    condense_results, fields_except, get_optional_u64_arg, get_string_arg, get_u64_arg,
    DASHBOARD_SUMMARY_FIELDS,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::transport::Transport;

/// Tool name.
pub const TOOL: &str = "redash_dashboard";

const DEFAULT_PAGE_SIZE: u64 = 10;

/// Get the dashboard tool definition.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        TOOL,
        "Manage Redash dashboards. Actions: list, get, create, update, publish, delete. \
         update forwards every other argument (e.g. name, tags) to Redash as-is.",
        schema!(object {
            required: {
                "action": ["list", "get", "create", "update", "publish", "delete"]
            },
            optional: {
                "id": integer => "Dashboard ID",
                "name": string => "Dashboard name (for create/update)",
                "page": integer = 1,
                "page_size": integer = 10 => "Results per page (default 10, max 250)"
            }
        }),
    )]
}

/// Dispatch a dashboard tool call.
pub fn dispatch<T: Transport>(
    client: &RedashClient<T>,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let action = get_string_arg(&args, "action")?;

    match action.as_str() {
        "list" => {
            let page = get_optional_u64_arg(&args, "page")?.unwrap_or(1);
            let page_size = get_optional_u64_arg(&args, "page_size")?.unwrap_or(DEFAULT_PAGE_SIZE);
            let data = client.list_dashboards(page, page_size)?;
            Ok(condense_results(data, DASHBOARD_SUMMARY_FIELDS))
        }
        "get" => client.get_dashboard(get_u64_arg(&args, "id")?),
        "create" => client.create_dashboard(&get_string_arg(&args, "name")?),
        "update" => {
            let id = get_u64_arg(&args, "id")?;
            client.update_dashboard(id, fields_except(&args, &["action", "id"]))
        }
        "publish" => client.publish_dashboard(get_u64_arg(&args, "id")?),
        "delete" => {
            client.delete_dashboard(get_u64_arg(&args, "id")?)?;
            Ok(json!({ "success": true }))
        }
        _ => Err(McpError::UnknownAction(action)),
    }
}
