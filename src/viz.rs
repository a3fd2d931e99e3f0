//! Visualization builders.
//!
//! Each builder assembles the options object Redash expects for one chart
//! kind. Builders are pure; `Visualization::create` sends the result. Column
//! names are not checked against the query's result schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::client::RedashClient;
use crate::error::Result;
use crate::transport::Transport;

/// Redash visualization type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VizType {
    /// Any chart (pie, line, column...); the series type lives in the options.
    Chart,
    /// Single-number counter.
    Counter,
}

/// A visualization ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct Visualization {
    /// Query the visualization renders.
    pub query_id: u64,
    /// Type tag.
    pub viz_type: VizType,
    /// Display name.
    pub name: String,
    /// Type-specific options.
    pub options: JsonValue,
}

impl Visualization {
    /// Create this visualization in Redash.
    pub fn create<T: Transport>(&self, client: &RedashClient<T>) -> Result<JsonValue> {
        client.create_visualization(self.query_id, self.viz_type, &self.name, &self.options)
    }
}

/// Pie chart: one category column, one value column.
pub fn pie(query_id: u64, name: &str, x: &str, y: &str) -> Visualization {
    chart(
        query_id,
        name,
        json!({
            "globalSeriesType": "pie",
            "columnMapping": column_mapping(x, &[y]),
            "legend": { "enabled": true },
        }),
    )
}

/// Line chart. `datetime` types the x axis as time instead of category.
pub fn line<S: AsRef<str>>(
    query_id: u64,
    name: &str,
    x: &str,
    ys: &[S],
    datetime: bool,
) -> Visualization {
    chart(
        query_id,
        name,
        json!({
            "globalSeriesType": "line",
            "columnMapping": column_mapping(x, ys),
            "legend": { "enabled": true },
            "xAxis": { "type": if datetime { "datetime" } else { "-" } },
            "yAxis": [{ "type": "linear" }],
            "sortX": true,
        }),
    )
}

/// Column (bar) chart, optionally stacked.
pub fn bar<S: AsRef<str>>(
    query_id: u64,
    name: &str,
    x: &str,
    ys: &[S],
    stacked: bool,
) -> Visualization {
    let stacking = if stacked { json!("normal") } else { JsonValue::Null };
    chart(
        query_id,
        name,
        json!({
            "globalSeriesType": "column",
            "columnMapping": column_mapping(x, ys),
            "legend": { "enabled": true },
            "series": { "stacking": stacking },
        }),
    )
}

/// Counter showing the first row of `column`, two decimals, with `suffix`.
pub fn counter(query_id: u64, name: &str, column: &str, suffix: &str) -> Visualization {
    Visualization {
        query_id,
        viz_type: VizType::Counter,
        name: name.to_string(),
        options: json!({
            "counterColName": column,
            "rowNumber": 1,
            "stringDecimal": 2,
            "stringSuffix": suffix,
        }),
    }
}

fn chart(query_id: u64, name: &str, options: JsonValue) -> Visualization {
    Visualization {
        query_id,
        viz_type: VizType::Chart,
        name: name.to_string(),
        options,
    }
}

// A y column that is also the x column ends up as "y".
fn column_mapping<S: AsRef<str>>(x: &str, ys: &[S]) -> JsonValue {
    let mut mapping = Map::new();
    mapping.insert(x.to_string(), json!("x"));
    for y in ys {
        mapping.insert(y.as_ref().to_string(), json!("y"));
    }
    JsonValue::Object(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_pure_and_maps_columns() {
        let first = line(42, "N", "x", &["a", "b"], true);
        let second = line(42, "N", "x", &["a", "b"], true);
        assert_eq!(first, second);

        assert_eq!(first.viz_type, VizType::Chart);
        assert_eq!(
            first.options["columnMapping"],
            json!({"x": "x", "a": "y", "b": "y"})
        );
        assert_eq!(first.options["xAxis"], json!({"type": "datetime"}));
        assert_eq!(first.options["yAxis"], json!([{"type": "linear"}]));
        assert_eq!(first.options["sortX"], json!(true));
    }

    #[test]
    fn test_line_category_axis() {
        let viz = line(1, "N", "day", &["n"], false);
        assert_eq!(viz.options["xAxis"], json!({"type": "-"}));
    }

    #[test]
    fn test_pie_options() {
        let viz = pie(3, "Share", "country", "users");
        assert_eq!(
            viz.options,
            json!({
                "globalSeriesType": "pie",
                "columnMapping": {"country": "x", "users": "y"},
                "legend": {"enabled": true}
            })
        );
    }

    #[test]
    fn test_bar_stacking() {
        let stacked = bar(3, "B", "x", &["a"], true);
        assert_eq!(stacked.options["series"], json!({"stacking": "normal"}));
        assert_eq!(stacked.options["globalSeriesType"], json!("column"));

        let grouped = bar(3, "B", "x", &["a"], false);
        assert_eq!(grouped.options["series"], json!({"stacking": null}));
    }

    #[test]
    fn test_counter_options() {
        let viz = counter(42, "Total", "count", "%");
        assert_eq!(viz.viz_type, VizType::Counter);
        assert_eq!(
            viz.options,
            json!({
                "counterColName": "count",
                "rowNumber": 1,
                "stringDecimal": 2,
                "stringSuffix": "%"
            })
        );
    }

    #[test]
    fn test_y_column_overrides_x_role() {
        let viz = bar(1, "B", "n", &["n"], false);
        assert_eq!(viz.options["columnMapping"], json!({"n": "y"}));
    }

    #[test]
    fn test_viz_type_serializes_uppercase() {
        assert_eq!(serde_json::to_value(VizType::Chart).unwrap(), json!("CHART"));
        assert_eq!(serde_json::to_value(VizType::Counter).unwrap(), json!("COUNTER"));
    }
}
