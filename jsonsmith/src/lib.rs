//! jsonsmith - AI-assisted JSON tooling
//!
//! This crate provides:
//! - A prompt enhancer that turns raw prompts into structured JSON
//! - A JSON explainer (explain / docs / summary / free-form questions)
//! - Tree-to-graph conversion of JSON documents for visual display
//! - A proxy server that forwards shaped requests to an OpenAI-compatible AI gateway
//! - A client and workbench used by the command-line front end

pub mod analysis;
pub mod api;
pub mod client;
pub mod document;
pub mod enhance;
pub mod graph;
pub mod provider;

pub use analysis::AnalysisKind;
pub use enhance::{Enhancement, PromptCategory};
pub use graph::{build_graph, JsonGraph};
pub use provider::{GatewayProvider, LlmProvider, LlmRequest, LlmResponse};

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variables consulted for the gateway API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["AI_GATEWAY_API_KEY", "LOVABLE_API_KEY"];

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration for the proxy server
#[derive(Debug, Clone, Deserialize)]
pub struct JsonsmithConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum log level: "error", "warn", "info", "debug" or "trace"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upstream AI gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_bind_addr() -> String { "0.0.0.0:8080".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for JsonsmithConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl JsonsmithConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Configuration for the OpenAI-compatible AI gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name passed through to the gateway
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional API key (otherwise read from the environment)
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP timeout for a single completion
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature used for prompt enhancement
    #[serde(default = "default_enhance_temperature")]
    pub enhance_temperature: f32,
}

fn default_base_url() -> String { "https://ai.gateway.lovable.dev/v1".to_string() }
fn default_model() -> String { "google/gemini-2.5-flash".to_string() }
fn default_timeout_secs() -> u64 { 120 }
fn default_enhance_temperature() -> f32 { 0.7 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            enhance_temperature: default_enhance_temperature(),
        }
    }
}

impl GatewayConfig {
    /// The configured API key, or the first non-empty one found in the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|key| !key.trim().is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = JsonsmithConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.gateway.model, "google/gemini-2.5-flash");
        assert_eq!(config.gateway.timeout_secs, 120);
        assert!((config.gateway.enhance_temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_gateway_section() {
        let config = JsonsmithConfig::from_toml_str(
            r#"
bind_addr = "127.0.0.1:9000"

[gateway]
base_url = "http://localhost:4000"
api_key = "secret"
"#,
        )
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.gateway.base_url, "http://localhost:4000");
        assert_eq!(config.gateway.model, "google/gemini-2.5-flash");
        assert_eq!(config.gateway.resolve_api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = JsonsmithConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            JsonsmithConfig::from_toml_str("bind_addr = ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
