//! Local stand-in for an Ollama server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct FakeBehaviour {
    pub status: StatusCode,
    pub reply: String,
    pub delay: Duration,
    pub models: Vec<&'static str>,
}

impl Default for FakeBehaviour {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            reply: String::new(),
            delay: Duration::ZERO,
            models: vec!["deepseek-r1:14b"],
        }
    }
}

struct FakeState {
    behaviour: FakeBehaviour,
    requests: Mutex<Vec<Value>>,
}

pub struct FakeOllama {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

impl FakeOllama {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Bodies received on `/api/generate`.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().clone()
    }
}

impl Drop for FakeOllama {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn generate(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.requests.lock().push(body);

    let behaviour = &state.behaviour;
    if !behaviour.delay.is_zero() {
        tokio::time::sleep(behaviour.delay).await;
    }
    if behaviour.status != StatusCode::OK {
        return (behaviour.status, "model unavailable").into_response();
    }

    Json(json!({
        "model": "deepseek-r1:14b",
        "created_at": "2025-03-01T08:00:00Z",
        "response": behaviour.reply,
        "done": true
    }))
    .into_response()
}

async fn tags(State(state): State<Arc<FakeState>>) -> Response {
    let behaviour = &state.behaviour;
    if behaviour.status != StatusCode::OK {
        return (behaviour.status, "unavailable").into_response();
    }

    let models: Vec<Value> = behaviour
        .models
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "size": 9_000_000_000u64,
                "modified_at": "2025-02-14T10:00:00Z",
                "digest": "sha256:0123abcd",
                "details": {"family": "qwen2"}
            })
        })
        .collect();
    Json(json!({ "models": models })).into_response()
}

pub async fn spawn_fake_ollama(behaviour: FakeBehaviour) -> std::io::Result<FakeOllama> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(FakeState {
        behaviour,
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/generate", post(generate))
        .route("/api/tags", get(tags))
        .with_state(Arc::clone(&state));

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(FakeOllama {
        addr,
        state,
        handle,
    })
}
