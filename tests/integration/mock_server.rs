//! Mock HTTP server setup for integration tests

use ai_throughput_bench::config::HttpSettings;
use ai_throughput_bench::transport::HttpTransport;
use ai_throughput_bench::RequestExecutor;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;

pub const API_KEY: &str = "sk-test";
pub const MODEL: &str = "test-model";

/// Test fixture that manages a mock completions endpoint
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub fn new() -> Self {
        let server = Server::new();
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    pub fn transport(&self) -> HttpTransport {
        HttpTransport::new(
            &self.base_url,
            Some(API_KEY.to_string()),
            &HttpSettings::default(),
        )
        .expect("build transport")
    }

    pub fn executor(&self) -> RequestExecutor {
        RequestExecutor::new(Arc::new(self.transport()), MODEL)
    }

    /// SSE response served `hits` times; each payload becomes one `data:` event
    pub fn mock_sse_stream(&mut self, payloads: &[&str], hits: usize) -> Mock {
        let body: String = payloads
            .iter()
            .map(|p| format!("data: {}\n\n", p))
            .collect();
        self.server
            .mock("POST", "/v1/completions")
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": MODEL,
                "stream": true
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .expect(hits)
            .create()
    }

    /// JSON response for any request to the endpoint
    pub fn mock_json_response(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/v1/completions")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }
}

/// Successful streamed chunk in delta form
pub fn delta(content: &str) -> String {
    serde_json::json!({"choices": [{"delta": {"content": content}, "index": 0}]}).to_string()
}
