//! Saved query tool.
//!
//! Tool: redash_query
//! Actions: list, search, get, create, update, archive, delete, run, adhoc

use serde_json::{json, Map, Value as JsonValue};

use crate::client::{NewQuery, RedashClient};
use crate::convert::{
    condense_results, fields_except, get_optional_string, get_optional_u64_arg, get_string_arg,
    get_u64_arg, QUERY_SUMMARY_FIELDS,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::transport::Transport;

/// Tool name.
pub const TOOL: &str = "redash_query";

/// Default page size for `list`.
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Get the query tool definition.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        TOOL,
        "Manage Redash queries. Actions: list, search, get, create, update, archive, delete, run, adhoc",
        schema!(object {
            required: {
                "action": ["list", "search", "get", "create", "update", "archive", "delete", "run", "adhoc"]
            },
            optional: {
                "id": integer => "Query ID (for get/update/archive/delete/run)",
                "q": string => "Search term (for search)",
                "name": string => "Query name (for create)",
                "query": string => "SQL query (for create/update/adhoc)",
                "description": string => "Query description (for create)",
                "data_source_id": integer => "Data source ID",
                "page": integer = 1,
                "page_size": integer = 10 => "Results per page (default 10, max 250)",
                "timeout": integer = 60 => "Maximum status checks while waiting (for run)"
            }
        }),
    )]
}

/// Dispatch a query tool call.
pub fn dispatch<T: Transport>(
    client: &RedashClient<T>,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let action = get_string_arg(&args, "action")?;

    match action.as_str() {
        "list" => {
            let page = get_optional_u64_arg(&args, "page")?.unwrap_or(1);
            let page_size = get_optional_u64_arg(&args, "page_size")?.unwrap_or(DEFAULT_PAGE_SIZE);
            let data = client.list_queries(page, page_size)?;
            Ok(condense_results(data, QUERY_SUMMARY_FIELDS))
        }

        "search" => {
            let q = get_string_arg(&args, "q")?;
            let data = client.search_queries(&q)?;
            Ok(condense_results(data, QUERY_SUMMARY_FIELDS))
        }

        "get" => client.get_query(get_u64_arg(&args, "id")?),

        "create" => {
            let new = NewQuery {
                name: get_string_arg(&args, "name")?,
                query: get_string_arg(&args, "query")?,
                data_source_id: get_u64_arg(&args, "data_source_id")?,
                description: get_optional_string(&args, "description").unwrap_or_default(),
            };
            client.create_query(&new)
        }

        "update" => {
            let id = get_u64_arg(&args, "id")?;
            client.update_query(id, fields_except(&args, &["action", "id"]))
        }

        "archive" => client.archive_query(get_u64_arg(&args, "id")?),

        "delete" => {
            client.delete_query(get_u64_arg(&args, "id")?)?;
            Ok(json!({ "success": true }))
        }

        "run" => {
            let id = get_u64_arg(&args, "id")?;
            let max_polls = get_optional_u64_arg(&args, "timeout")?;
            Ok(client.run_query(id, max_polls)?.into_json())
        }

        "adhoc" => {
            let query = get_string_arg(&args, "query")?;
            let data_source_id = get_u64_arg(&args, "data_source_id")?;
            client.execute_adhoc(&query, data_source_id)
        }

        _ => Err(McpError::UnknownAction(action)),
    }
}
