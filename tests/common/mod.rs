//! Shared helpers for integration tests.
//!
//! [`MockServer`] is a small axum app on an ephemeral port that records every
//! request and answers with a canned response.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use bravozero::{BravoZeroClient, ClientConfig, ServiceConfig};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A request captured by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    /// Decoded query parameters, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://mock{}", self.uri)).unwrap();
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Canned response returned for every request.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl MockResponse {
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(value).unwrap(),
        }
    }

    pub fn ok(value: &Value) -> Self {
        Self::json(200, value)
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(status: u16, body: &[u8]) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: vec![(
                "content-type".to_string(),
                "application/octet-stream".to_string(),
            )],
            body: body.to_vec(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    response: Mutex<MockResponse>,
}

/// Mock HTTP server bound to `127.0.0.1` on a random port.
pub struct MockServer {
    base_url: String,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start(response: MockResponse) -> Self {
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            response: Mutex::new(response),
        });

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_response(&self, response: MockResponse) {
        *self.state.response.lock().unwrap() = response;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    /// Service configuration pointing at this server, without signing.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new(self.base_url.clone(), TEST_API_KEY, TEST_AGENT_ID)
    }

    /// Facade pointing at this server with a raw signing key.
    pub fn client(&self) -> BravoZeroClient {
        BravoZeroClient::new(
            ClientConfig::new(TEST_API_KEY, TEST_AGENT_ID)
                .with_base_url(self.base_url.clone())
                .with_private_key(signing_seed()),
        )
        .unwrap()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        uri,
        headers,
        body: body.to_vec(),
    });

    let response = state.response.lock().unwrap().clone();
    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        headers.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    (response.status, headers, response.body)
}

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_AGENT_ID: &str = "agent-7";

/// Deterministic 32-byte Ed25519 seed.
pub fn signing_seed() -> Vec<u8> {
    (1u8..=32).collect()
}

pub fn memory_json(id: &str) -> Value {
    serde_json::json!({
        "id": id,
        "content": format!("content of {id}"),
        "memoryType": "semantic",
        "importance": 0.5,
        "strength": 1.0,
        "consolidationState": "active",
        "namespace": TEST_AGENT_ID,
        "tags": [],
        "createdAt": "2025-01-15T10:30:00Z",
        "lastAccessedAt": "2025-01-15T10:30:00Z",
        "accessCount": 0,
        "metadata": {}
    })
}

pub fn file_json(path: &str) -> Value {
    let name = path.rsplit('/').next().unwrap_or(path);
    serde_json::json!({
        "path": path,
        "name": name,
        "size": 42,
        "isDirectory": false,
        "modifiedAt": "2025-01-15T10:30:00Z",
        "permissions": "rw-r--r--"
    })
}
