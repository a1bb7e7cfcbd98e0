//! Configuration management for PharmAudit using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::LlmConfig;
use crate::session::PhaseTimings;

/// Default address for `pharmaudit serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3040";

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        format: &'static str,
        path: PathBuf,
        message: String,
    },
}

/// Timing of the cosmetic progress steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Milliseconds from selection until "Verifying".
    #[serde(default = "default_verify_after_ms")]
    pub verify_after_ms: u64,
    /// Milliseconds from selection until "Reasoning".
    #[serde(default = "default_reason_after_ms")]
    pub reason_after_ms: u64,
}

fn default_verify_after_ms() -> u64 {
    2_000
}

fn default_reason_after_ms() -> u64 {
    5_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            verify_after_ms: default_verify_after_ms(),
            reason_after_ms: default_reason_after_ms(),
        }
    }
}

impl SessionConfig {
    pub fn timings(&self) -> PhaseTimings {
        PhaseTimings {
            verify_after: Duration::from_millis(self.verify_after_ms),
            reason_after: Duration::from_millis(self.reason_after_ms),
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Progress step timings.
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, discovering `pharmaudit.*` files in standard locations.
    ///
    /// Falls back to defaults (with environment overrides) when nothing is found
    /// or the discovered file cannot be parsed.
    pub async fn load() -> Self {
        match prefer::load("pharmaudit").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("Ignoring config file: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load from an explicit path when given, otherwise discover.
    pub async fn load_with_override(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => Ok(Self::load().await),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, or JSON otherwise.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        // Environment wins over the file.
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            format,
            path: path.to_path_buf(),
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_error("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error("JSON", e.to_string())),
        }
    }

    /// Effective configuration as TOML. The API key is never included.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.timings(), PhaseTimings::default());
        assert_eq!(ServerConfig::default().bind, DEFAULT_BIND);
    }

    #[tokio::test]
    async fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pharmaudit.toml");
        std::fs::write(
            &path,
            r#"
[session]
verify_after_ms = 10

[server]
bind = "0.0.0.0:8080"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.session.verify_after_ms, 10);
        assert_eq!(config.session.reason_after_ms, 5_000);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_load_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("pharmaudit.yaml");
        std::fs::write(&yaml, "session:\n  reason_after_ms: 42\n").unwrap();
        let config = Config::load_from_path(&yaml).await.unwrap();
        assert_eq!(config.session.reason_after_ms, 42);

        let json = dir.path().join("pharmaudit.json");
        std::fs::write(&json, r#"{"server": {"bind": "127.0.0.1:9"}}"#).unwrap();
        let config = Config::load_from_path(&json).await.unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load_from_path(&dir.path().join("nope.toml")).await;
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "session = [").unwrap();
        let err = Config::load_from_path(&broken).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_to_toml_omits_api_key() {
        let mut config = Config::default();
        config.llm = config.llm.with_api_key("secret-key");
        let rendered = config.to_toml();
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[session]"));
    }
}
