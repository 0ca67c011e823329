//! # Studyforge Core
//!
//! Core library for the Studyforge learning-report generator.
//! Provides source aggregation, prompt building, the LLM provider interface,
//! report generation, figure rendering, PDF export, and session management.

pub mod config;
pub mod error;
pub mod figure;
pub mod generator;
pub mod llm;
pub mod preferences;
pub mod prompt;
pub mod providers;
pub mod render;
pub mod session;
pub mod sources;

// Re-export commonly used types at the crate root.
pub use config::{AppConfig, LlmConfig, RetryConfig};
pub use error::{Result, StudyforgeError};
pub use generator::{Report, ReportGenerator};
pub use llm::{LlmProvider, MockLlmProvider};
pub use preferences::{KnowledgeLevel, UserPreferences};
pub use providers::OpenAiCompatibleProvider;
pub use render::{MarkupView, ReportRenderer};
pub use session::Session;
pub use sources::{SourceAggregator, SourceBundle};
