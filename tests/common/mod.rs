//! In-process mock of the orchestrator backend's auth surface plus a few passthrough endpoints.
#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use orchestrator_client::{ApiClient, ClientConfig, SessionStore};

pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct MockState {
    access: Mutex<HashSet<String>>,
    refresh: Mutex<HashSet<String>>,
    pub permissions: Mutex<Vec<String>>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub workload_calls: AtomicUsize,
    pub always_401_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub seen_auth: Mutex<Vec<Option<String>>>,
    pub refresh_delay_ms: AtomicU64,
    pub malformed_refresh: AtomicBool,
    minted: AtomicUsize,
}

impl MockState {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| self.access.lock().contains(t))
            .unwrap_or(false)
    }

    fn record_auth(&self, headers: &HeaderMap) {
        let v = headers.get("authorization").and_then(|v| v.to_str().ok()).map(|s| s.to_string());
        self.seen_auth.lock().push(v);
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/me", get(me))
            .route("/auth/logout", post(logout))
            .route("/workloads", get(list_workloads).post(echo_workload))
            .route("/workloads/api", delete(delete_workload))
            .route("/always-401", get(always_401))
            .route("/boom", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kaboom") }))
            .route("/silent", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/not-json", get(|| async { "hello" }))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });
        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> (ApiClient, SessionStore) {
        let session = SessionStore::new();
        let client = ApiClient::new(ClientConfig::new(self.base_url()), session.clone()).expect("client");
        (client, session)
    }

    pub fn accept_access(&self, token: &str) {
        self.state.access.lock().insert(token.to_string());
    }

    pub fn accept_refresh(&self, token: &str) {
        self.state.refresh.lock().insert(token.to_string());
    }

    pub fn grant(&self, perms: &[&str]) {
        *self.state.permissions.lock() = perms.iter().map(|s| s.to_string()).collect();
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    if body.get("password").and_then(|v| v.as_str()) != Some(PASSWORD) {
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }
    state.access.lock().insert("A1".into());
    state.refresh.lock().insert("R1".into());
    Json(json!({"access_token": "A1", "refresh_token": "R1", "token_type": "bearer"})).into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let presented = body.get("refresh_token").and_then(|v| v.as_str()).unwrap_or_default().to_string();
    if !state.refresh.lock().remove(&presented) {
        return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
    }
    if state.malformed_refresh.load(Ordering::SeqCst) {
        return Json(json!({"access_token": "A-only"})).into_response();
    }
    let n = state.minted.fetch_add(1, Ordering::SeqCst) + 2;
    let (access, refresh) = (format!("A{}", n), format!("R{}", n));
    state.access.lock().insert(access.clone());
    state.refresh.lock().insert(refresh.clone());
    Json(json!({"access_token": access, "refresh_token": refresh})).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    let perms = state.permissions.lock().clone();
    Json(json!({"id": 1, "email": "ops@example.com", "username": "ops", "is_active": true, "permissions": perms}))
        .into_response()
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({"status": "ok"})).into_response()
}

async fn list_workloads(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.workload_calls.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    if !state.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    Json(json!([{"name": "api", "replicas": 3}])).into_response()
}

async fn echo_workload(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !state.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    let trace = headers.get("x-trace").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    Json(json!({"received": body, "content_type": content_type, "trace": trace})).into_response()
}

async fn delete_workload(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn always_401(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.always_401_calls.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    (StatusCode::UNAUTHORIZED, "token revoked").into_response()
}
