#![allow(dead_code)]

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use schemapush::api::ManagementApi;
use schemapush::{AccessToken, Credentials};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

pub const VALID_TOKEN: &str = "sbp_valid_token";
pub const PROJECT_REF: &str = "sbljtekgogrkelfhxtxq";

/// One request as seen by the mock management API.
#[derive(Debug, Clone)]
pub struct Received {
    pub project_ref: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<usize>,
    pub body: String,
}

#[derive(Clone)]
struct MockState {
    reply_status: StatusCode,
    reply_body: String,
    delay: Option<Duration>,
    received: Arc<Mutex<Vec<Received>>>,
}

pub struct MockApi {
    pub base: Url,
    received: Arc<Mutex<Vec<Received>>>,
}

impl MockApi {
    /// Requests the query endpoint has seen so far.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().expect("mock state poisoned").clone()
    }

    pub fn client(&self) -> ManagementApi {
        client_for(self.base.clone())
    }
}

pub fn client_for(base: Url) -> ManagementApi {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build test client");
    ManagementApi::new(http, base).expect("invalid mock base url")
}

pub fn credentials(token: &str) -> Credentials {
    Credentials::new(AccessToken::new(token).expect("token"), PROJECT_REF).expect("credentials")
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn query_handler(
    State(state): State<MockState>,
    Path(project_ref): Path<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state
        .received
        .lock()
        .expect("mock state poisoned")
        .push(Received {
            project_ref,
            authorization: header_str(&headers, header::AUTHORIZATION),
            content_type: header_str(&headers, header::CONTENT_TYPE),
            content_length: header_str(&headers, header::CONTENT_LENGTH)
                .and_then(|v| v.parse().ok()),
            body,
        });
    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    (state.reply_status, state.reply_body.clone())
}

async fn organizations_handler(headers: HeaderMap) -> (StatusCode, String) {
    let expected = format!("Bearer {VALID_TOKEN}");
    match header_str(&headers, header::AUTHORIZATION) {
        Some(auth) if auth == expected => (
            StatusCode::OK,
            r#"[{"id":"org_1","name":"studio"}]"#.to_string(),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Unauthorized"}"#.to_string(),
        ),
    }
}

/// Serve a mock management API on an ephemeral port. The query endpoint
/// always answers with `status` and `body`.
pub async fn spawn_mock(status: StatusCode, body: &str) -> MockApi {
    spawn_mock_with_delay(status, body, None).await
}

pub async fn spawn_mock_with_delay(
    status: StatusCode,
    body: &str,
    delay: Option<Duration>,
) -> MockApi {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply_status: status,
        reply_body: body.to_string(),
        delay,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/v1/projects/{project_ref}/query", post(query_handler))
        .route("/v1/organizations", get(organizations_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock listener");
    let addr = listener.local_addr().expect("mock listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server failed");
    });

    MockApi {
        base: Url::parse(&format!("http://{addr}")).expect("mock url"),
        received,
    }
}

/// A base URL on which nothing is listening.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("probe listener has no address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("closed port url")
}
