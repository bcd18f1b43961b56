//! Integration tests for the pizzeria client.
//!
//! The tests run the real client stack (session store, request pipeline,
//! resource layer, checkout) against [`StubBackend`], an in-process `axum`
//! server that answers with canned responses and records every request it
//! receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pizzeria-integration-tests
//! ```
//!
//! No external services are needed.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use pizzeria_client::http::AuthorizedClient;
use pizzeria_client::navigation::RecordingNavigator;
use pizzeria_client::{ApiClient, SessionStore};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

pub use axum::http::Method;

/// Path prefix the stub serves the API under.
pub const API_PREFIX: &str = "/api/v1/";

/// A canned response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    /// `Value::Null` sends an empty body.
    pub body: Value,
}

impl StubResponse {
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    #[must_use]
    pub const fn status(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to [`API_PREFIX`].
    pub path: String,
    pub authorization: Option<String>,
    /// JSON body, `Value::Null` when absent.
    pub body: Value,
}

type Responder = Arc<dyn Fn(&Value) -> StubResponse + Send + Sync>;

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<(Method, String), Responder>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the pizzeria REST backend.
pub struct StubBackend {
    base_url: Url,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

impl StubBackend {
    /// Start a stub on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Stub backend has no address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub backend failed");
        });

        let base_url = Url::parse(&format!("http://{addr}{API_PREFIX}"))
            .expect("Stub backend URL is valid");

        Self {
            base_url,
            state,
            server,
        }
    }

    /// Base URL to point the client at.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Answer `method path` with a fixed status and body.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let response = StubResponse::status(status, body);
        self.respond_with(method, path, move |_| response.clone());
    }

    /// Answer `method path` with a response computed from the request body.
    pub fn respond_with(
        &self,
        method: Method,
        path: &str,
        responder: impl Fn(&Value) -> StubResponse + Send + Sync + 'static,
    ) {
        self.state
            .routes
            .lock()
            .insert((method, path.to_owned()), Arc::new(responder));
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method == *method && r.path == path)
            .cloned()
            .collect()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_owned();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization,
        body: body.clone(),
    });

    let responder = state.routes.lock().get(&(method, path.clone())).cloned();
    let Some(responder) = responder else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("no stub for {path}")})),
        )
            .into_response();
    };

    let response = responder(&body);
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if response.body.is_null() {
        status.into_response()
    } else {
        (status, Json(response.body)).into_response()
    }
}

/// A client stack wired to a fresh stub backend.
pub struct TestContext {
    pub backend: StubBackend,
    pub session: SessionStore,
    pub navigator: Arc<RecordingNavigator>,
    pub api: ApiClient,
}

impl TestContext {
    /// Stub backend plus a client with an empty in-memory session.
    pub async fn new() -> Self {
        Self::with_session(SessionStore::in_memory()).await
    }

    /// Stub backend plus a client using `session`.
    pub async fn with_session(session: SessionStore) -> Self {
        let backend = StubBackend::start().await;
        let navigator = Arc::new(RecordingNavigator::new());
        let http = AuthorizedClient::new(session.clone(), navigator.clone());
        let api = ApiClient::with_http(backend.base_url().clone(), http);

        Self {
            backend,
            session,
            navigator,
            api,
        }
    }
}
