//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

pub const API_KEY: &str = "integration-key";

/// Model reply with a fenced report followed by trailing prose.
pub fn report_reply(score: u8, status: &str) -> String {
    let report = json!({
        "authenticity_score": score,
        "status": status,
        "extracted_data": {
            "brand": "Dolo 650",
            "generic_name": "Paracetamol",
            "manufacturer": "Micro Labs",
            "manufacturer_address": "Bengaluru",
            "batch": "DOBS3975",
            "license": "KTK/28/711/97",
            "mfg_date": "01/2025",
            "exp_date": "12/2027"
        },
        "visual_forensics": {
            "findings": ["Foil embossing present"],
            "red_flags": [],
            "assets": {"logo_analysis": "Matches", "font_analysis": "Consistent", "qr_present": true}
        },
        "grounding_check": {
            "manufacturer_verified": true,
            "batch_valid": true,
            "alerts_found": [],
            "sources": [{"title": "model supplied", "uri": "https://example.invalid"}]
        },
        "recommendation": "Safe to use",
        "reasoning_summary": "All checks passed"
    });
    format!(
        "Here is the audit.\n```json\n{}\n```\nLet me know if you need more.",
        serde_json::to_string_pretty(&report).unwrap()
    )
}

/// Requests seen by the fake endpoint.
#[derive(Clone, Default)]
pub struct Captured {
    pub bodies: Arc<Mutex<Vec<Value>>>,
    pub keys: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct FakeState {
    captured: Captured,
    reply: Arc<FakeReply>,
}

enum FakeReply {
    Text(String),
    Error(StatusCode, String),
}

async fn generate(State(state): State<FakeState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.captured.bodies.lock().unwrap().push(body);
    if let Some(key) = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) {
        state.captured.keys.lock().unwrap().push(key.to_string());
    }

    match state.reply.as_ref() {
        FakeReply::Text(text) => Json(json!({
            "candidates": [{
                "content": {"parts": [{"text": text}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"title": "CDSCO Drug Alerts", "uri": "https://cdsco.gov.in/alerts"}},
                        {"retrievedContext": {}},
                        {"web": {"title": "Micro Labs", "uri": "https://microlabsltd.com"}}
                    ]
                }
            }]
        }))
        .into_response(),
        FakeReply::Error(status, message) => (
            *status,
            Json(json!({"error": {"code": status.as_u16(), "message": message}})),
        )
            .into_response(),
    }
}

async fn spawn(reply: FakeReply) -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1beta/models/:call", post(generate))
        .with_state(FakeState {
            captured: captured.clone(),
            reply: Arc::new(reply),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

/// Local stand-in for the generateContent endpoint answering with `text`.
pub async fn spawn_fake_gemini(text: String) -> (SocketAddr, Captured) {
    spawn(FakeReply::Text(text)).await
}

/// Local stand-in that fails every call.
pub async fn spawn_failing_gemini(status: StatusCode, message: &str) -> (SocketAddr, Captured) {
    spawn(FakeReply::Error(status, message.to_string())).await
}
