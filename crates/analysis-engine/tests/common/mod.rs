//! In-process stand-in for an Ollama generate endpoint

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

/// How the mock answers every request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with `{"response": <text>}`
    Response(String),
    /// 200 with an arbitrary JSON body
    Body(Value),
    /// Bare status code
    Status(u16),
    /// Sleep before answering with `{"response": ""}`
    Delay(Duration),
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub struct MockEndpoint {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockEndpoint {
    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn generate(State(state): State<MockState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(body);
    match state.reply {
        MockReply::Response(text) => (StatusCode::OK, Json(serde_json::json!({ "response": text }))),
        MockReply::Body(body) => (StatusCode::OK, Json(body)),
        MockReply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(serde_json::json!({ "error": "mock failure" })),
        ),
        MockReply::Delay(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, Json(serde_json::json!({ "response": "" })))
        }
    }
}

/// Bind a mock endpoint on an ephemeral port
pub async fn spawn_mock(reply: MockReply) -> MockEndpoint {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/api/generate", post(generate))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockEndpoint {
        url: format!("http://{}/api/generate", addr),
        requests,
    }
}
