//! Error types for the Studyforge core library.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering LLM, figure rendering, document export, and configuration domains.

use std::path::PathBuf;

/// Top-level error type for the Studyforge core library.
#[derive(Debug, thiserror::Error)]
pub enum StudyforgeError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Figure error: {0}")]
    Figure(#[from] FigureError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },

    #[error("Provider returned an empty completion for model {model}")]
    EmptyCompletion { model: String },
}

/// Errors from figure rendering.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    #[error("Chart rendering failed: {message}")]
    Render { message: String },

    #[error("Failed to write figure file {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Errors from document export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Cannot write {path}: file is locked or permission denied. Close the document if it is open and try again")]
    FileLocked { path: PathBuf },

    #[error("Failed to create output file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("No usable font family found (searched system font directories)")]
    FontNotFound,

    #[error("PDF rendering failed: {message}")]
    Render { message: String },

    #[error("Failed to load figure image {path}: {message}")]
    FigureImage { path: PathBuf, message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Environment variable not set: {var}")]
    EnvVarMissing { var: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `StudyforgeError`.
pub type Result<T> = std::result::Result<T, StudyforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_llm() {
        let err = StudyforgeError::Llm(LlmError::ApiRequest {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "LLM error: API request failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_auth() {
        let err = LlmError::AuthFailed {
            provider: "groq".into(),
        };
        assert_eq!(err.to_string(), "Authentication failed for provider groq");
    }

    #[test]
    fn test_error_display_export_locked() {
        let err = StudyforgeError::Export(ExportError::FileLocked {
            path: PathBuf::from("AI_Learning_Report.pdf"),
        });
        assert!(err.to_string().contains("AI_Learning_Report.pdf"));
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_error_display_config() {
        let err = StudyforgeError::Config(ConfigError::EnvVarMissing {
            var: "API_KEY".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Environment variable not set: API_KEY"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StudyforgeError = io_err.into();
        assert!(matches!(err, StudyforgeError::Io(_)));
    }

    #[test]
    fn test_llm_error_variants() {
        let err = LlmError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(err.to_string(), "Rate limited by provider, retry after 60s");

        let err = LlmError::EmptyCompletion {
            model: "llama3-70b-8192".into(),
        };
        assert!(err.to_string().contains("empty completion"));
    }
}
