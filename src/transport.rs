//! HTTP transport to the Redash REST API.
//!
//! `Transport` is the seam between the client operations and the wire; the
//! production implementation uses a blocking `reqwest` client, tests swap in a
//! recording stub.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::Config;
use crate::error::{McpError, Result};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 2000;

/// One HTTP request per call, JSON in and out.
pub trait Transport {
    /// GET `path` with query parameters.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<JsonValue>;

    /// POST `body` as JSON to `path`.
    fn post(&self, path: &str, body: &JsonValue) -> Result<JsonValue>;

    /// DELETE `path`. Returns `None` when the response body is empty.
    fn delete(&self, path: &str) -> Result<Option<JsonValue>>;
}

/// `Transport` over a blocking reqwest client.
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a client carrying the API key and JSON content type on every
    /// request, bounded by the configured timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Key {}", config.api_key()))
            .map_err(|e| McpError::Config(format!("invalid API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Option<JsonValue>> {
        debug!(method, path, "calling Redash API");

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(McpError::Api {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body: truncate_utf8(&body, MAX_ERROR_BODY),
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<JsonValue> {
        let request = self.http.get(self.url(path)).query(query);
        Ok(self.send("GET", path, request)?.unwrap_or(JsonValue::Null))
    }

    fn post(&self, path: &str, body: &JsonValue) -> Result<JsonValue> {
        let request = self.http.post(self.url(path)).json(body);
        Ok(self.send("POST", path, request)?.unwrap_or(JsonValue::Null))
    }

    fn delete(&self, path: &str) -> Result<Option<JsonValue>> {
        let request = self.http.delete(self.url(path));
        self.send("DELETE", path, request)
    }
}

fn truncate_utf8(input: &str, max_bytes: usize) -> String {
    if input.len() <= max_bytes {
        return input.to_string();
    }

    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...(truncated)", &input[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_bodies() {
        assert_eq!(truncate_utf8("short", 10), "short");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; cutting at 3 would split the second one.
        let out = truncate_utf8("éé", 3);
        assert_eq!(out, "é...(truncated)");
    }

    #[test]
    fn test_new_rejects_unprintable_key() {
        let config = Config::new("http://localhost:5000", "bad\nkey").unwrap();
        assert!(matches!(HttpTransport::new(&config), Err(McpError::Config(_))));
    }

    mod http {
        use super::*;
        use serde_json::json;
        use wiremock::{
            matchers::{body_json, header, method, path, query_param},
            Mock, MockServer, ResponseTemplate,
        };

        /// Run `f` against a transport pointed at `server`. The blocking client
        /// must live on a blocking thread, outside the runtime's workers.
        async fn with_transport<F, R>(server: &MockServer, f: F) -> R
        where
            F: FnOnce(&HttpTransport) -> R + Send + 'static,
            R: Send + 'static,
        {
            let base_url = server.uri();
            tokio::task::spawn_blocking(move || {
                let config = Config::new(&base_url, "secret").expect("test config");
                let transport = HttpTransport::new(&config).expect("test transport");
                f(&transport)
            })
            .await
            .expect("blocking task panicked")
        }

        #[tokio::test]
        async fn test_get_sends_auth_headers_and_query() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/api/queries"))
                .and(header("authorization", "Key secret"))
                .and(header("content-type", "application/json"))
                .and(query_param("page", "2"))
                .and(query_param("page_size", "5"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
                .expect(1)
                .mount(&server)
                .await;

            let result = with_transport(&server, |t| {
                t.get(
                    "/api/queries",
                    &[("page", "2".to_string()), ("page_size", "5".to_string())],
                )
            })
            .await;

            assert_eq!(result.unwrap(), json!({"count": 0}));
        }

        #[tokio::test]
        async fn test_post_sends_json_body() {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/api/queries/4/results"))
                .and(header("authorization", "Key secret"))
                .and(body_json(json!({"max_age": 0})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job": {"id": "j"}})))
                .expect(1)
                .mount(&server)
                .await;

            let result = with_transport(&server, |t| {
                t.post("/api/queries/4/results", &json!({"max_age": 0}))
            })
            .await;

            assert_eq!(result.unwrap(), json!({"job": {"id": "j"}}));
        }

        #[tokio::test]
        async fn test_error_status_becomes_api_error() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/api/queries/404"))
                .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
                .mount(&server)
                .await;

            let result = with_transport(&server, |t| t.get("/api/queries/404", &[])).await;

            match result {
                Err(McpError::Api {
                    method,
                    path,
                    status,
                    body,
                }) => {
                    assert_eq!(method, "GET");
                    assert_eq!(path, "/api/queries/404");
                    assert_eq!(status, 404);
                    assert_eq!(body, "not found");
                }
                other => panic!("expected Api error, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_delete_with_empty_body_is_none() {
            let server = MockServer::start().await;

            Mock::given(method("DELETE"))
                .and(path("/api/widgets/3"))
                .and(header("authorization", "Key secret"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .and(path("/api/queries/8"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 8})))
                .mount(&server)
                .await;

            let (empty, full) = with_transport(&server, |t| {
                (t.delete("/api/widgets/3"), t.delete("/api/queries/8"))
            })
            .await;

            assert_eq!(empty.unwrap(), None);
            assert_eq!(full.unwrap(), Some(json!({"id": 8})));
        }

        #[tokio::test]
        async fn test_get_with_empty_body_is_null() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/api/data_sources"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;

            let result = with_transport(&server, |t| t.get("/api/data_sources", &[])).await;

            assert_eq!(result.unwrap(), JsonValue::Null);
        }
    }
}
