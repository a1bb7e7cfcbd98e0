//! Hosted multimodal model access.
//!
//! [`AnalysisProvider`] is the logical contract (media + prompt in, answer
//! text + citations out); [`GeminiProvider`] implements it over HTTP.

mod config;
mod gemini;
mod provider;

pub use config::{LlmConfig, API_KEY_VARS};
pub use gemini::GeminiProvider;
pub use provider::{AnalysisProvider, ProviderError, ProviderRequest, ProviderResponse};
