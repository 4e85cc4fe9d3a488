//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_toolkit::config::ApiConfig;
use api_toolkit::ui::{DialogAlert, DialogOutcome, Navigator, Notifier, SessionExit, Snackbar};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Requests seen by the mock API.
#[derive(Clone, Default)]
pub struct MockState {
    pub hits: Arc<AtomicUsize>,
    pub pages: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub state: MockState,
}

impl MockApi {
    /// Client config pointing at this server.
    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: format!("http://{}", self.addr),
            environment: "development".to_string(),
            ..ApiConfig::default()
        }
    }
}

/// Start the mock API on an ephemeral port.
///
/// Routes live under `/api/v3` except the CSRF cookie route.
pub async fn start_mock_api() -> MockApi {
    let state = MockState::default();
    let app = Router::new()
        .route("/api/v3/items", get(items))
        .route("/api/v3/single", get(single))
        .route("/api/v3/flaky", get(flaky))
        .route("/api/v3/broken", get(broken))
        .route("/api/v3/expired", get(expired))
        .route("/api/v3/forbidden", get(forbidden))
        .route("/api/v3/report", get(report))
        .route("/api/v3/headers", get(echo_headers))
        .route("/api/v3/echo", get(echo).post(echo).put(echo).delete(no_content))
        .route("/api/csrf-cookie", get(no_content))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockApi { addr, state }
}

fn record(state: &MockState, params: &HashMap<String, String>) -> u64 {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.pages.lock().unwrap().push(params.clone());
    params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1)
}

/// Three pages; page 2 answers last.
async fn items(State(state): State<MockState>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page = record(&state, &params);
    if page == 2 {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    Json(json!({
        "meta": { "current_page": page, "last_page": 3, "per_page": 2, "total": 6 },
        "data": [page * 10 + 1, page * 10 + 2],
    }))
}

async fn single(State(state): State<MockState>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    record(&state, &params);
    Json(json!({
        "meta": { "current_page": 1, "last_page": 1, "per_page": 25, "total": 3 },
        "data": ["a", "b", "c"],
    }))
}

/// Page 2 of 3 fails.
async fn flaky(State(state): State<MockState>, Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let page = record(&state, &params);
    if page == 2 {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "Page store offline", "status_code": 500 } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "meta": { "last_page": 3 }, "data": [page] })),
    )
}

async fn broken(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": "Database unavailable", "status_code": 500 } })),
    )
}

async fn expired(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": { "message": "Unauthenticated.", "status_code": 403 } })),
    )
}

async fn forbidden(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": { "message": "This action is unauthorized.", "status_code": 403 } })),
    )
}

async fn report() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"report.pdf\""),
        ],
        vec![0x25u8, 0x50, 0x44, 0x46, 0x00, 0xff],
    )
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
    Json(json!({
        "request_id": get("x-request-id"),
        "company": get("x-company"),
        "token": get("x-session-token"),
        "client": get("x-client"),
    }))
}

async fn echo(method: Method, body: Bytes) -> Json<Value> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({ "method": method.as_str(), "body": body }))
}

async fn no_content(State(state): State<MockState>) -> StatusCode {
    state.hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

/// Notifier that records everything and confirms dialogs.
#[derive(Default)]
pub struct RecordingNotifier {
    pub snackbars: Mutex<Vec<Snackbar>>,
    pub dialogs: Mutex<Vec<DialogAlert>>,
}

impl Notifier for RecordingNotifier {
    fn display_snackbar(&self, snackbar: Snackbar) {
        self.snackbars.lock().unwrap().push(snackbar);
    }

    fn display_dialog_alert(&self, alert: DialogAlert) -> oneshot::Receiver<DialogOutcome> {
        self.dialogs.lock().unwrap().push(alert);
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(DialogOutcome::Confirmed);
        rx
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub exits: Mutex<Vec<SessionExit>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, exit: SessionExit) {
        self.exits.lock().unwrap().push(exit);
    }
}

impl RecordingNavigator {
    /// Yield until the dialog task has navigated, up to a bounded number of turns.
    pub async fn settled_exits(&self) -> Vec<SessionExit> {
        for _ in 0..100 {
            if !self.exits.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.exits.lock().unwrap().clone()
    }
}
