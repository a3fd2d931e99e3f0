//! Argument extraction and response shaping for tool handlers.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Fields kept per record when condensing a query list.
pub const QUERY_SUMMARY_FIELDS: &[&str] = &["id", "name", "data_source_id", "created_at"];

/// Fields kept per record when condensing a dashboard list.
pub const DASHBOARD_SUMMARY_FIELDS: &[&str] = &["id", "name", "slug", "created_at"];

/// Helper to get a required string argument from JSON arguments.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional string argument from JSON arguments.
pub fn get_optional_string(args: &Map<String, JsonValue>, name: &str) -> Option<String> {
    args.get(name).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Helper to get a required u64 argument from JSON arguments.
pub fn get_u64_arg(args: &Map<String, JsonValue>, name: &str) -> Result<u64> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Err(McpError::MissingArg(name.to_string())),
        Some(v) => v.as_u64().ok_or_else(|| McpError::InvalidArg {
            name: name.to_string(),
            reason: "Expected a non-negative integer".to_string(),
        }),
    }
}

/// Helper to get an optional u64 argument. Absent or null is `None`; any
/// other value must be a non-negative integer.
pub fn get_optional_u64_arg(args: &Map<String, JsonValue>, name: &str) -> Result<Option<u64>> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(_) => get_u64_arg(args, name).map(Some),
    }
}

/// Helper to get an optional boolean argument.
pub fn get_optional_bool(args: &Map<String, JsonValue>, name: &str) -> Option<bool> {
    args.get(name).and_then(|v| v.as_bool())
}

/// Get a list of column names given either as a comma separated string or as
/// an array of strings. Entries are trimmed and empty ones dropped; a missing
/// argument yields an empty list.
pub fn get_string_list(args: &Map<String, JsonValue>, name: &str) -> Result<Vec<String>> {
    let raw: Vec<&str> = match args.get(name) {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::String(s)) => s.split(',').collect(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str().ok_or_else(|| McpError::InvalidArg {
                    name: name.to_string(),
                    reason: "Expected array of strings".to_string(),
                })
            })
            .collect::<Result<_>>()?,
        Some(_) => {
            return Err(McpError::InvalidArg {
                name: name.to_string(),
                reason: "Expected a string or array of strings".to_string(),
            })
        }
    };

    Ok(raw
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

/// Copy every argument except the listed ones. Used for update actions, whose
/// fields go to Redash untouched.
pub fn fields_except(args: &Map<String, JsonValue>, skip: &[&str]) -> Map<String, JsonValue> {
    args.iter()
        .filter(|(k, _)| !skip.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Reduce every record of a paginated `results` array to `fields`.
///
/// Record count and order are preserved, missing fields become null, and a
/// payload without a `results` array is returned unchanged.
pub fn condense_results(mut data: JsonValue, fields: &[&str]) -> JsonValue {
    if let Some(JsonValue::Array(records)) = data.get_mut("results") {
        for record in records.iter_mut() {
            let summary: Map<String, JsonValue> = fields
                .iter()
                .map(|f| {
                    let value = record.get(*f).cloned().unwrap_or(JsonValue::Null);
                    (f.to_string(), value)
                })
                .collect();
            *record = JsonValue::Object(summary);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_condense_keeps_count_order_and_whitelist() {
        let data = json!({
            "count": 2,
            "page": 1,
            "results": [
                {"id": 2, "name": "b", "query": "select 2", "data_source_id": 1,
                 "created_at": "2024-01-02", "user": {"id": 9}},
                {"id": 1, "name": "a", "query": "select 1", "tags": ["x"]}
            ]
        });

        let out = condense_results(data, QUERY_SUMMARY_FIELDS);
        assert_eq!(out["count"], json!(2));
        assert_eq!(
            out["results"],
            json!([
                {"id": 2, "name": "b", "data_source_id": 1, "created_at": "2024-01-02"},
                {"id": 1, "name": "a", "data_source_id": null, "created_at": null}
            ])
        );
    }

    #[test]
    fn test_condense_dashboards() {
        let data = json!({"results": [
            {"id": 5, "name": "Ops", "slug": "ops", "created_at": "t", "widgets": [1, 2]}
        ]});
        let out = condense_results(data, DASHBOARD_SUMMARY_FIELDS);
        assert_eq!(
            out["results"],
            json!([{"id": 5, "name": "Ops", "slug": "ops", "created_at": "t"}])
        );
    }

    #[test]
    fn test_condense_without_results_passes_through() {
        let data = json!({"message": "nope"});
        assert_eq!(condense_results(data.clone(), QUERY_SUMMARY_FIELDS), data);
    }

    #[test]
    fn test_string_list_from_csv_and_array() {
        let a = args(json!({"y": " a, b ,,c "}));
        assert_eq!(get_string_list(&a, "y").unwrap(), vec!["a", "b", "c"]);

        let a = args(json!({"y": ["a", "b"]}));
        assert_eq!(get_string_list(&a, "y").unwrap(), vec!["a", "b"]);

        let a = args(json!({}));
        assert!(get_string_list(&a, "y").unwrap().is_empty());

        let a = args(json!({"y": 3}));
        assert!(matches!(
            get_string_list(&a, "y"),
            Err(McpError::InvalidArg { .. })
        ));
    }

    #[test]
    fn test_u64_arg_missing_vs_invalid() {
        let a = args(json!({"id": "seven", "n": null}));
        assert!(matches!(get_u64_arg(&a, "id"), Err(McpError::InvalidArg { .. })));
        assert!(matches!(get_u64_arg(&a, "n"), Err(McpError::MissingArg(_))));
        assert!(matches!(get_u64_arg(&a, "other"), Err(McpError::MissingArg(_))));
    }

    #[test]
    fn test_optional_u64_arg_rejects_wrong_types() {
        let a = args(json!({"page": 2, "size": null, "timeout": "5", "width": -1}));
        assert_eq!(get_optional_u64_arg(&a, "page").unwrap(), Some(2));
        assert_eq!(get_optional_u64_arg(&a, "size").unwrap(), None);
        assert_eq!(get_optional_u64_arg(&a, "other").unwrap(), None);
        assert!(matches!(
            get_optional_u64_arg(&a, "timeout"),
            Err(McpError::InvalidArg { .. })
        ));
        assert!(matches!(
            get_optional_u64_arg(&a, "width"),
            Err(McpError::InvalidArg { .. })
        ));
    }

    #[test]
    fn test_fields_except() {
        let a = args(json!({"action": "update", "id": 3, "name": "x", "query": "select 1"}));
        let fields = fields_except(&a, &["action", "id"]);
        assert_eq!(
            JsonValue::Object(fields),
            json!({"name": "x", "query": "select 1"})
        );
    }
}
