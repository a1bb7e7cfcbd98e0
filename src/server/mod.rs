//! Web interface for running forensic audits.
//!
//! Serves a single page that follows the current scan phase, plus a small
//! JSON API for uploading media and polling or resetting the state.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::llm::{AnalysisProvider, GeminiProvider, LlmConfig};
use crate::session::{PhaseTimings, ScanController};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub controller: ScanController,
    pub provider: Arc<dyn AnalysisProvider>,
    pub llm: LlmConfig,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let provider = GeminiProvider::new(config.llm.clone())?;
        Ok(Self::with_provider(
            Arc::new(provider),
            config.llm.clone(),
            config.session.timings(),
        ))
    }

    pub fn with_provider(
        provider: Arc<dyn AnalysisProvider>,
        llm: LlmConfig,
        timings: PhaseTimings,
    ) -> Self {
        Self {
            controller: ScanController::new(timings),
            provider,
            llm,
        }
    }
}

/// Start the web server.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
