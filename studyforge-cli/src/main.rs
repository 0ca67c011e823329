//! Studyforge CLI — interactive learning-report generator.
//!
//! Collects topic/goal/level preferences, generates a personalized report
//! through the configured LLM provider, renders the illustrative chart, and
//! optionally exports everything to a PDF.

mod markdown;
mod repl;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use studyforge_core::config::{load_config, resolve_api_key};
use studyforge_core::{OpenAiCompatibleProvider, ReportGenerator};

/// Studyforge: personalized AI learning reports
#[derive(Parser, Debug)]
#[command(name = "studyforge", version, about, long_about = None)]
struct Cli {
    /// Working directory for artifacts (figure, exported PDF)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Derive per-session unique artifact filenames
    #[arg(long)]
    unique_artifacts: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = load_config(Some(&workspace))
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if cli.unique_artifacts {
        config.report.unique_artifacts = true;
    }

    // The credential is a startup-time requirement, not a per-call one.
    let api_key = resolve_api_key(&config.llm).map_err(|e| {
        anyhow::anyhow!(
            "{}. Set it in your environment or a .env file and restart.",
            e
        )
    })?;

    let provider = OpenAiCompatibleProvider::new(&config.llm, api_key)
        .map_err(|e| anyhow::anyhow!("Provider setup failed: {}", e))?;
    let generator = ReportGenerator::new(Arc::new(provider))
        .with_sampling(config.llm.temperature, Some(config.llm.max_tokens));

    repl::run_interactive(generator, config, workspace).await
}
