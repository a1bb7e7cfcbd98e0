//! Google Gemini `generateContent` provider.
//!
//! Sends the media inline with the prompt and, when requested, enables the
//! `google_search` tool so the answer is grounded on live web results. The
//! grounding citations come back in `groundingMetadata`, separate from the
//! answer text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::LlmConfig;
use super::provider::{AnalysisProvider, ProviderError, ProviderRequest, ProviderResponse};
use crate::models::Source;

/// Gemini provider using Google's Generative Language API.
pub struct GeminiProvider {
    config: LlmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    InlineData { inline_data: GeminiInlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    code: u16,
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

impl GeminiProvider {
    /// Create a provider for the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }
}

fn build_request(request: &ProviderRequest) -> GeminiRequest {
    let tools = if request.search_grounding {
        vec![GeminiTool {
            google_search: GoogleSearch {},
        }]
    } else {
        Vec::new()
    };

    GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![
                GeminiPart::InlineData {
                    inline_data: GeminiInlineData {
                        mime_type: request.media.mime_type.clone(),
                        data: request.media.data.clone(),
                    },
                },
                GeminiPart::Text {
                    text: request.prompt.clone(),
                },
            ],
        }],
        tools,
    }
}

/// Collapse the first candidate into answer text plus its web citations.
fn into_provider_response(response: GeminiResponse) -> Result<ProviderResponse, ProviderError> {
    if let Some(error) = response.error {
        return Err(ProviderError::Api {
            status: error.code,
            message: error.message,
        });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(ProviderResponse::default());
    };

    let text: String = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Source {
                    title: web.title,
                    uri: web.uri,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ProviderResponse {
        text: Some(text).filter(|t| !t.is_empty()),
        citations,
    })
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let api_key = self
            .config
            .resolve_api_key()
            .ok_or(ProviderError::MissingApiKey)?;

        let body = build_request(request);
        let url = self.url(&request.model);
        debug!(
            "POST {} ({}, grounding: {})",
            url, request.media.mime_type, request.search_grounding
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Gemini returned HTTP {}", status);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_resp: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        into_provider_response(gemini_resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::EncodedMedia;

    fn request(search_grounding: bool) -> ProviderRequest {
        ProviderRequest {
            model: "gemini-test".to_string(),
            media: EncodedMedia {
                mime_type: "image/png".to_string(),
                data: "YWJj".to_string(),
            },
            prompt: "audit this".to_string(),
            search_grounding,
        }
    }

    #[test]
    fn test_request_body_with_grounding() {
        let body = serde_json::to_value(build_request(&request(true))).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{
                    "parts": [
                        {"inline_data": {"mime_type": "image/png", "data": "YWJj"}},
                        {"text": "audit this"}
                    ]
                }],
                "tools": [{"google_search": {}}]
            })
        );
    }

    #[test]
    fn test_request_body_without_grounding_omits_tools() {
        let body = serde_json::to_value(build_request(&request(false))).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_response_text_and_citations() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "Analysis...\n"}, {"text": "done"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"title": "CDSCO", "uri": "https://cdsco.gov.in"}},
                        {"retrievedContext": {"uri": "ignored"}},
                        {"web": {"title": "Alert", "uri": "https://example.org/alert"}}
                    ]
                }
            }]
        });
        let parsed: GeminiResponse = serde_json::from_value(raw).unwrap();
        let response = into_provider_response(parsed).unwrap();

        assert_eq!(response.text.as_deref(), Some("Analysis...\ndone"));
        assert_eq!(response.citations.len(), 2);
        assert_eq!(response.citations[0].title, "CDSCO");
        assert_eq!(response.citations[1].uri, "https://example.org/alert");
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let parsed: GeminiResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}))
                .unwrap();
        let response = into_provider_response(parsed).unwrap();
        assert_eq!(response, ProviderResponse::default());
    }

    #[test]
    fn test_response_error_body() {
        let parsed: GeminiResponse = serde_json::from_value(
            serde_json::json!({"error": {"code": 400, "message": "API key not valid"}}),
        )
        .unwrap();
        let err = into_provider_response(parsed).unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let provider =
            GeminiProvider::new(LlmConfig::base_default().with_endpoint("http://localhost:9/"))
                .unwrap();
        assert_eq!(
            provider.url("gemini-test"),
            "http://localhost:9/v1beta/models/gemini-test:generateContent"
        );
    }
}
