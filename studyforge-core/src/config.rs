//! Configuration system for Studyforge.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config -> environment. Configuration is loaded from
//! `~/.config/studyforge/config.toml` and/or `.studyforge/config.toml` in the
//! working directory, with `STUDYFORGE_`-prefixed environment overrides
//! (e.g. `STUDYFORGE_LLM__MODEL`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for Studyforge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub report: ReportConfig,
    pub ui: UiConfig,
}

/// Configuration for the generative text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name; only "openai-compatible" endpoints are supported.
    pub provider: String,
    /// Model identifier sent with each completion request.
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional explicit API key. Takes precedence over `api_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens to generate in a response.
    pub max_tokens: usize,
    /// Default temperature for generation.
    pub temperature: f32,
    /// Per-request timeout in seconds. The underlying transport enforces no
    /// useful bound of its own, so this must stay finite.
    pub request_timeout_secs: u64,
    /// Retry policy for transient provider errors.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai-compatible".to_string(),
            model: "llama3-70b-8192".to_string(),
            api_key_env: "API_KEY".to_string(),
            api_key: None,
            base_url: None,
            max_tokens: 4096,
            temperature: 0.7,
            request_timeout_secs: 60,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for transient LLM errors (rate limit, timeout, connection).
///
/// Authentication and malformed-response errors are never retried regardless
/// of these settings. The default is zero retries: one request per report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of additional attempts after the first failure.
    pub max_retries: usize,
    /// Upper bound on the exponential backoff, in seconds.
    pub backoff_cap_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff_cap_secs: 32,
        }
    }
}

/// Configuration for report artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Filename of the exported PDF document.
    pub document_name: String,
    /// Derive per-session unique artifact filenames instead of the fixed
    /// names. Fixed names mean concurrent sessions in one directory race on
    /// the same paths.
    pub unique_artifacts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            document_name: "AI_Learning_Report.pdf".to_string(),
            unique_artifacts: false,
        }
    }
}

/// Configuration for report display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Render the model's raw markup (bold markers, links) when displaying
    /// the report. The report text is untrusted model output; hosts that do
    /// not trust their text source should disable this and get plain text.
    pub raw_markup: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { raw_markup: true }
    }
}

/// Load configuration with layering: defaults -> user config -> workspace
/// config -> environment variables.
pub fn load_config(workspace: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "studyforge", "studyforge") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".studyforge").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (STUDYFORGE_LLM__MODEL, STUDYFORGE_UI__RAW_MARKUP, ...)
    figment = figment.merge(Env::prefixed("STUDYFORGE_").split("__"));

    figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

/// Resolve the API credential at startup.
///
/// Checks the explicit `api_key` first, then the environment variable named
/// by `api_key_env`. A missing credential is a configuration error raised
/// before any session starts, not a per-call failure.
pub fn resolve_api_key(llm: &LlmConfig) -> Result<String, ConfigError> {
    llm.api_key
        .clone()
        .or_else(|| std::env::var(&llm.api_key_env).ok())
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ConfigError::EnvVarMissing {
            var: llm.api_key_env.clone(),
        })
}
