//! Mock HTTP server setup for integration tests

use envenomation_client::{ClientConfig, InferenceClient, StatusPolicy};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

pub const INFER_PATH: &str = "/api/infer";

/// Test fixture that manages a mock inference service
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server with the default status policy.
    pub fn client(&self) -> InferenceClient {
        self.client_with(StatusPolicy::RequireSuccess)
    }

    pub fn client_with(&self, policy: StatusPolicy) -> InferenceClient {
        InferenceClient::builder()
            .config(ClientConfig::default().with_timeout_secs(5))
            .base_url(&self.base_url)
            .status_policy(policy)
            .build()
            .expect("client builds against mock server")
    }

    /// Expect exactly one POST carrying `{"symptoms": query}` and answer with `status`/`body`.
    pub async fn mock_infer(&mut self, query: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", INFER_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "symptoms": query })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }
}

/// A base URL nothing is listening on.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
