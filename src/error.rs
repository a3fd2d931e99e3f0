//! Error types for the MCP server.
//!
//! Every failure inside a tool handler ends up as an `McpError`; the server
//! turns it into an `{"error": ...}` payload using its `Display` form.

use serde::{Deserialize, Serialize};

/// MCP server errors.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum McpError {
    /// Unknown tool requested.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown `action` discriminator for a known tool.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Unknown visualization `type`.
    #[error("Unknown type: {0}")]
    UnknownVizType(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArg(String),

    /// Invalid argument value.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Redash answered with a non-2xx status.
    #[error("redash returned {status} for {method} {path}: {body}")]
    Api {
        /// HTTP verb of the failed request
        method: String,
        /// Endpoint path, without the base URL
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The request never produced a response (connect, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body or inbound value was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(String),

    /// Startup configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        McpError::Http(err.to_string())
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Json(err.to_string())
    }
}

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_errors_use_reported_wording() {
        assert_eq!(
            McpError::UnknownTool("nope".into()).to_string(),
            "Unknown tool: nope"
        );
        assert_eq!(
            McpError::UnknownAction("explode".into()).to_string(),
            "Unknown action: explode"
        );
        assert_eq!(
            McpError::UnknownVizType("radar".into()).to_string(),
            "Unknown type: radar"
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = McpError::Api {
            method: "GET".into(),
            path: "/api/queries/9".into(),
            status: 404,
            body: "{\"message\": \"Not found\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "redash returned 404 for GET /api/queries/9: {\"message\": \"Not found\"}"
        );
    }
}
