//! Logical request/response contract with a hosted multimodal model.

use async_trait::async_trait;
use thiserror::Error;

use crate::media::EncodedMedia;
use crate::models::Source;

/// One analysis request: media plus instructions.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Model identifier.
    pub model: String,
    /// Inline media payload.
    pub media: EncodedMedia,
    /// Instruction prompt sent alongside the media.
    pub prompt: String,
    /// Whether the model may consult live web search.
    pub search_grounding: bool,
}

/// Raw reply from the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Free-form answer text, if any.
    pub text: Option<String>,
    /// Citations attached by search grounding, separate from the text.
    pub citations: Vec<Source>,
}

/// A hosted model that can answer a [`ProviderRequest`].
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Perform exactly one round trip.
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}

#[async_trait]
impl<P: AnalysisProvider + ?Sized> AnalysisProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        (**self).generate(request).await
    }
}

/// Errors raised by the transport or the provider itself.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key not set. Export GEMINI_API_KEY (get one from https://ai.google.dev/)")]
    MissingApiKey,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}
