//! Visualization tool.
//!
//! Tool: redash_viz
//! Types: pie, line, bar, counter, update

use serde_json::{Map, Value as JsonValue};

use crate::client::RedashClient;
use crate::convert::{
    fields_except, get_optional_bool, get_optional_string, get_string_arg, get_string_list,
    get_u64_arg,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::transport::Transport;
use crate::viz;

/// Tool name.
pub const TOOL: &str = "redash_viz";

/// Get the visualization tool definition.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        TOOL,
        "Create visualizations. Types: pie, line, bar, counter. \
         Type update changes an existing visualization (id) with the remaining arguments.",
        schema!(object {
            required: {
                "type": ["pie", "line", "bar", "counter", "update"]
            },
            optional: {
                "id": integer => "Visualization ID (for update)",
                "query_id": integer => "Query the chart reads from (required for pie, line, bar, counter)",
                "name": string => "Visualization name (required for pie, line, bar, counter)",
                "x": string => "X-axis column",
                "y": string => "Y column(s) - comma separated for multiple",
                "datetime": boolean = true => "X-axis is datetime (for line)",
                "stacked": boolean = false => "Stacked bars (for bar)",
                "suffix": string = "" => "Suffix (for counter)"
            }
        }),
    )]
}

/// Dispatch a visualization tool call.
///
/// Every chart type needs `query_id` and `name`. `y` may be a comma separated
/// string or an array; entries are trimmed and empty ones are dropped, so
/// `"a,,b"` names two columns.
pub fn dispatch<T: Transport>(
    client: &RedashClient<T>,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let viz_type = get_string_arg(&args, "type")?;

    if viz_type == "update" {
        let id = get_u64_arg(&args, "id")?;
        return client.update_visualization(id, fields_except(&args, &["type", "id"]));
    }

    let query_id = get_u64_arg(&args, "query_id")?;
    let name = get_string_arg(&args, "name")?;
    let ys = get_string_list(&args, "y")?;

    let built = match viz_type.as_str() {
        "pie" => {
            let x = get_string_arg(&args, "x")?;
            let y = ys.first().cloned().unwrap_or_else(|| x.clone());
            viz::pie(query_id, &name, &x, &y)
        }
        "line" => {
            let x = get_string_arg(&args, "x")?;
            let datetime = get_optional_bool(&args, "datetime").unwrap_or(true);
            viz::line(query_id, &name, &x, &ys, datetime)
        }
        "bar" => {
            let x = get_string_arg(&args, "x")?;
            let stacked = get_optional_bool(&args, "stacked").unwrap_or(false);
            viz::bar(query_id, &name, &x, &ys, stacked)
        }
        "counter" => {
            let column = get_optional_string(&args, "x").unwrap_or_default();
            let suffix = get_optional_string(&args, "suffix").unwrap_or_default();
            viz::counter(query_id, &name, &column, &suffix)
        }
        _ => return Err(McpError::UnknownVizType(viz_type)),
    };

    built.create(client)
}
