//! Analysis provider configuration.

use serde::{Deserialize, Serialize};

/// Environment variables consulted for the provider credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration for the hosted multimodal model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API endpoint base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key; when unset it is read from the environment at call time
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Whether web-search grounding is requested
    #[serde(default = "default_search_grounding")]
    pub search_grounding: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_search_grounding() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            search_grounding: default_search_grounding(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `PHARMAUDIT_ENDPOINT`: API endpoint base URL
    /// - `PHARMAUDIT_MODEL`: Model identifier
    /// - `PHARMAUDIT_SEARCH_GROUNDING`: "true"/"1" or "false"/"0"
    /// - `PHARMAUDIT_TIMEOUT_SECS`: Request timeout
    ///
    /// The API key is deliberately not captured here; see [`Self::resolve_api_key`].
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PHARMAUDIT_ENDPOINT").filter(|v| !v.is_empty()) {
            self.endpoint = val;
        }
        if let Some(val) = lookup("PHARMAUDIT_MODEL").filter(|v| !v.is_empty()) {
            self.model = val;
        }
        if let Some(val) = lookup("PHARMAUDIT_SEARCH_GROUNDING") {
            if val.eq_ignore_ascii_case("true") || val == "1" {
                self.search_grounding = true;
            } else if val.eq_ignore_ascii_case("false") || val == "0" {
                self.search_grounding = false;
            }
        }
        if let Some(val) = lookup("PHARMAUDIT_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Resolve the credential: explicit config first, then the environment.
    ///
    /// Called once per request so a key exported after startup is picked up.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| {
                API_KEY_VARS
                    .into_iter()
                    .find_map(|name| lookup(name).filter(|k| !k.is_empty()))
            })
    }
}
