//! HTTP request handlers for the web server.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use tracing::{info, warn};

use super::AppState;
use crate::analysis::AnalysisFacade;
use crate::dashboard::render_page;
use crate::media::MediaSource;
use crate::session::AnalysisPhase;

fn phase_response(status: StatusCode, phase: &AnalysisPhase) -> Response {
    (status, Json(phase.snapshot())).into_response()
}

/// Media type declared by the client, without parameters.
///
/// Empty when the client sent none, so the encoder sniffs the content.
fn declared_mime_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// The single page, rendered for the current phase.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.controller.phase()))
}

/// Start a scan of the request body in the background.
pub async fn api_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "Upload is empty").into_response();
    }

    let mime_type = declared_mime_type(&headers);
    info!(
        "Received upload: {} bytes ({})",
        body.len(),
        if mime_type.is_empty() { "undeclared" } else { mime_type.as_str() }
    );

    let mut watcher = state.controller.subscribe();
    let controller = state.controller.clone();
    let facade = AnalysisFacade::new(state.provider.clone(), &state.llm);
    let source = MediaSource::Upload {
        bytes: body.to_vec(),
        mime_type,
    };

    tokio::spawn(async move {
        if let Err(e) = controller.scan(&facade, source).await {
            warn!("Scan ended without a report: {}", e);
        }
    });

    // Wait for the scan to register before reporting its phase.
    let phase = watcher
        .changed()
        .await
        .unwrap_or_else(|| state.controller.phase());
    phase_response(StatusCode::ACCEPTED, &phase)
}

/// Current phase as JSON.
pub async fn api_state(State(state): State<AppState>) -> Response {
    phase_response(StatusCode::OK, &state.controller.phase())
}

/// Reset to idle and return the new phase.
pub async fn api_reset(State(state): State<AppState>) -> Response {
    state.controller.reset();
    phase_response(StatusCode::OK, &state.controller.phase())
}

/// "New scan" form action.
pub async fn form_reset(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.reset();
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_declared_mime_type() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_mime_type(&headers), "");

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("image/jpeg; charset=binary"),
        );
        assert_eq!(declared_mime_type(&headers), "image/jpeg");
    }
}
