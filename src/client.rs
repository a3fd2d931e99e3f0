//! Redash API operations.
//!
//! One method per remote operation, each mapped onto a single HTTP request,
//! plus `run_query`, which submits a saved query and polls its job until it
//! finishes or the poll budget runs out.

use std::thread;

use serde_json::{json, Map, Value as JsonValue};
use tracing::debug;

use crate::config::PollSettings;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use crate::viz::VizType;

/// Job status: finished successfully.
pub const JOB_DONE: u64 = 3;
/// Job status: finished with an error.
pub const JOB_FAILED: u64 = 4;

/// Fields for a new saved query.
#[derive(Debug, Clone)]
pub struct NewQuery {
    /// Display name
    pub name: String,
    /// SQL text
    pub query: String,
    /// Owning data source
    pub data_source_id: u64,
    /// Free-form description
    pub description: String,
}

/// How a `run_query` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Submit returned no job; the response is passed through as is.
    Cached(JsonValue),
    /// Job reached a terminal status and its result was fetched.
    Completed(JsonValue),
    /// Job reached a terminal status without a result id (usually a failure).
    Finished(JsonValue),
    /// The poll budget ran out before a terminal status.
    TimedOut,
}

impl RunOutcome {
    /// Payload returned to the caller. A timeout becomes `{"error": "timeout"}`.
    pub fn into_json(self) -> JsonValue {
        match self {
            RunOutcome::Cached(v) | RunOutcome::Completed(v) | RunOutcome::Finished(v) => v,
            RunOutcome::TimedOut => json!({ "error": "timeout" }),
        }
    }
}

/// Client for the Redash REST API.
pub struct RedashClient<T: Transport = HttpTransport> {
    transport: T,
    poll: PollSettings,
}

impl<T: Transport> RedashClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T, poll: PollSettings) -> Self {
        Self { transport, poll }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Polling settings used by `run_query`.
    pub fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    // Data sources

    /// List all data sources.
    pub fn data_sources(&self) -> Result<JsonValue> {
        self.transport.get("/api/data_sources", &[])
    }

    // Queries

    /// List queries, one page at a time.
    pub fn list_queries(&self, page: u64, page_size: u64) -> Result<JsonValue> {
        self.transport.get("/api/queries", &paging(page, page_size))
    }

    /// Search queries by name.
    pub fn search_queries(&self, q: &str) -> Result<JsonValue> {
        self.transport.get("/api/queries", &[("q", q.to_string())])
    }

    /// Fetch a single query.
    pub fn get_query(&self, id: u64) -> Result<JsonValue> {
        self.transport.get(&format!("/api/queries/{}", id), &[])
    }

    /// Create a saved query.
    pub fn create_query(&self, new: &NewQuery) -> Result<JsonValue> {
        self.transport.post(
            "/api/queries",
            &json!({
                "name": new.name,
                "query": new.query,
                "data_source_id": new.data_source_id,
                "description": new.description,
            }),
        )
    }

    /// Update a query. `fields` are forwarded verbatim; Redash decides what
    /// is valid.
    pub fn update_query(&self, id: u64, fields: Map<String, JsonValue>) -> Result<JsonValue> {
        self.transport
            .post(&format!("/api/queries/{}", id), &JsonValue::Object(fields))
    }

    /// Archive (soft-delete) a query.
    pub fn archive_query(&self, id: u64) -> Result<JsonValue> {
        self.transport.post(
            &format!("/api/queries/{}", id),
            &json!({ "is_archived": true }),
        )
    }

    /// Permanently delete a query.
    pub fn delete_query(&self, id: u64) -> Result<Option<JsonValue>> {
        self.transport.delete(&format!("/api/queries/{}", id))
    }

    /// Execute SQL against a data source without saving it.
    pub fn execute_adhoc(&self, query: &str, data_source_id: u64) -> Result<JsonValue> {
        self.transport.post(
            "/api/query_results",
            &json!({ "query": query, "data_source_id": data_source_id }),
        )
    }

    // Dashboards

    /// List dashboards, one page at a time.
    pub fn list_dashboards(&self, page: u64, page_size: u64) -> Result<JsonValue> {
        self.transport.get("/api/dashboards", &paging(page, page_size))
    }

    /// Fetch a dashboard with its widgets.
    pub fn get_dashboard(&self, id: u64) -> Result<JsonValue> {
        self.transport.get(&format!("/api/dashboards/{}", id), &[])
    }

    /// Create an empty (draft) dashboard.
    pub fn create_dashboard(&self, name: &str) -> Result<JsonValue> {
        self.transport.post("/api/dashboards", &json!({ "name": name }))
    }

    /// Update a dashboard. `fields` are forwarded verbatim.
    pub fn update_dashboard(&self, id: u64, fields: Map<String, JsonValue>) -> Result<JsonValue> {
        self.transport
            .post(&format!("/api/dashboards/{}", id), &JsonValue::Object(fields))
    }

    /// Clear a dashboard's draft flag.
    pub fn publish_dashboard(&self, id: u64) -> Result<JsonValue> {
        self.transport.post(
            &format!("/api/dashboards/{}", id),
            &json!({ "is_draft": false }),
        )
    }

    /// Delete a dashboard.
    pub fn delete_dashboard(&self, id: u64) -> Result<Option<JsonValue>> {
        self.transport.delete(&format!("/api/dashboards/{}", id))
    }

    // Visualizations

    /// Create a visualization attached to a query.
    pub fn create_visualization(
        &self,
        query_id: u64,
        viz_type: VizType,
        name: &str,
        options: &JsonValue,
    ) -> Result<JsonValue> {
        self.transport.post(
            "/api/visualizations",
            &json!({
                "query_id": query_id,
                "type": viz_type,
                "name": name,
                "options": options,
            }),
        )
    }

    /// Update a visualization. `fields` are forwarded verbatim.
    pub fn update_visualization(
        &self,
        id: u64,
        fields: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        self.transport
            .post(&format!("/api/visualizations/{}", id), &JsonValue::Object(fields))
    }

    // Widgets

    /// Place a visualization on a dashboard.
    pub fn add_widget(&self, dashboard_id: u64, viz_id: u64, width: u64) -> Result<JsonValue> {
        self.transport.post(
            "/api/widgets",
            &json!({
                "dashboard_id": dashboard_id,
                "visualization_id": viz_id,
                "width": width,
                "options": {},
            }),
        )
    }

    /// Remove a widget from its dashboard.
    pub fn delete_widget(&self, id: u64) -> Result<Option<JsonValue>> {
        self.transport.delete(&format!("/api/widgets/{}", id))
    }

    // Query execution

    /// Start executing a saved query. Returns a job handle, or the result
    /// itself when Redash already has it cached.
    pub fn execute_query(&self, id: u64) -> Result<JsonValue> {
        self.transport
            .post(&format!("/api/queries/{}/results", id), &json!({}))
    }

    /// Fetch job status.
    pub fn get_job(&self, job_id: &str) -> Result<JsonValue> {
        self.transport.get(&format!("/api/jobs/{}", job_id), &[])
    }

    /// Fetch a stored query result.
    pub fn get_result(&self, result_id: &str) -> Result<JsonValue> {
        self.transport
            .get(&format!("/api/query_results/{}", result_id), &[])
    }

    /// Execute a saved query and wait for its result.
    ///
    /// Polls at most `max_polls` times (the client default when `None`),
    /// sleeping the configured interval before each status fetch. There is
    /// no cancellation; the budget is the only way out of a stuck job.
    pub fn run_query(&self, id: u64, max_polls: Option<u64>) -> Result<RunOutcome> {
        let submitted = self.execute_query(id)?;
        let job_id = match id_segment(submitted.pointer("/job/id")) {
            Some(job_id) => job_id,
            None => return Ok(RunOutcome::Cached(submitted)),
        };

        let max_polls = max_polls.unwrap_or(self.poll.max_polls);
        debug!(query_id = id, job_id = %job_id, max_polls, "waiting for query job");

        for _ in 0..max_polls {
            thread::sleep(self.poll.interval);

            let status = self.get_job(&job_id)?;
            let code = status.pointer("/job/status").and_then(JsonValue::as_u64);
            if !matches!(code, Some(JOB_DONE) | Some(JOB_FAILED)) {
                continue;
            }

            debug!(job_id = %job_id, status = ?code, "query job finished");
            return match id_segment(status.pointer("/job/query_result_id")) {
                Some(result_id) => Ok(RunOutcome::Completed(self.get_result(&result_id)?)),
                None => Ok(RunOutcome::Finished(status)),
            };
        }

        debug!(job_id = %job_id, "gave up waiting for query job");
        Ok(RunOutcome::TimedOut)
    }
}

fn paging(page: u64, page_size: u64) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("page_size", page_size.to_string())]
}

/// Render an id taken from a response as a path segment. Null, empty
/// strings, zero and non-scalar values count as "no id".
fn id_segment(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
