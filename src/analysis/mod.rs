//! Forensic analysis facade.
//!
//! Owns the single external call of an audit: the fixed prompt and the
//! encoded media go to the provider in one round trip, the reply is parsed
//! strictly into a [`ForensicReport`], and the provider's citations become
//! the report's sources. Nothing is retried, cached or retained.

mod parse;
mod prompt;

pub use parse::{extract_fenced_json, parse_report};
pub use prompt::FORENSIC_AUDIT_PROMPT;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{AnalysisProvider, LlmConfig, ProviderError, ProviderRequest};
use crate::media::EncodedMedia;
use crate::models::ForensicReport;

/// Errors that end an analysis attempt.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Empty response from model.")]
    EmptyResponse,

    #[error("Could not extract forensic data from model response.")]
    ExtractionFailed,

    #[error("{0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Runs one forensic audit per call against an [`AnalysisProvider`].
pub struct AnalysisFacade<P> {
    provider: P,
    model: String,
    search_grounding: bool,
}

impl<P: AnalysisProvider> AnalysisFacade<P> {
    /// Create a facade using the model and grounding settings from `config`.
    pub fn new(provider: P, config: &LlmConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            search_grounding: config.search_grounding,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze encoded media.
    pub async fn analyze(&self, media: &EncodedMedia) -> Result<ForensicReport, AnalysisError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            media: media.clone(),
            prompt: FORENSIC_AUDIT_PROMPT.to_string(),
            search_grounding: self.search_grounding,
        };

        info!(
            "Submitting {} ({} bytes) to {} model {}",
            media.mime_type,
            media.decoded_len(),
            self.provider.name(),
            self.model
        );

        let response = self.provider.generate(&request).await.map_err(|e| {
            warn!("Analysis provider error: {}", e);
            AnalysisError::from(e)
        })?;

        let text = response.text.unwrap_or_default();
        debug!(
            "Provider replied with {} chars and {} citations",
            text.len(),
            response.citations.len()
        );

        let report = parse_report(&text, response.citations).inspect_err(|e| {
            warn!("Failed to parse analysis response: {}", e);
        })?;

        info!(
            "Analysis complete: {} ({}/100)",
            report.status, report.authenticity_score
        );
        Ok(report)
    }

    /// Analyze a raw base64 payload with its media type.
    pub async fn analyze_payload(
        &self,
        data: &str,
        mime_type: &str,
    ) -> Result<ForensicReport, AnalysisError> {
        let media = EncodedMedia {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        };
        self.analyze(&media).await
    }
}
