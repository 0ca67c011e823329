//! Interactive session loop.
//!
//! Collects preferences, runs the generation pipeline, shows the report, and
//! drives the export action. Every failure is reported and the loop keeps
//! going; generated in-memory state survives failed exports so the user can
//! close the open document and retry.

use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use tracing::warn;

use studyforge_core::config::AppConfig;
use studyforge_core::preferences::{KnowledgeLevel, UserPreferences};
use studyforge_core::session::Session;
use studyforge_core::{ReportGenerator, ReportRenderer};

use crate::markdown;

const DISPLAY_WIDTH: usize = 100;

/// Run the interactive preference -> report -> export loop.
pub async fn run_interactive(
    generator: ReportGenerator,
    config: AppConfig,
    workspace: PathBuf,
) -> anyhow::Result<()> {
    println!("\n  Studyforge — personalized learning reports\n");

    loop {
        let prefs = collect_preferences()?;
        let mut session = Session::new(prefs, &workspace)
            .with_document_name(&config.report.document_name);
        if config.report.unique_artifacts {
            session = session.with_unique_artifacts();
        }

        println!("\n  Generating your personalized research-based report...\n");
        match session.generate_report(&generator, &config.llm.retry).await {
            Ok(report) => {
                let view = ReportRenderer::markup_view(report, config.ui.raw_markup);
                println!(
                    "{}",
                    markdown::render_report(&view.content, view.raw_markup, DISPLAY_WIDTH)
                );
            }
            Err(e) => {
                eprintln!("  Report generation failed: {e}");
                if !Confirm::new()
                    .with_prompt("Start over with new preferences?")
                    .default(true)
                    .interact()?
                {
                    return Ok(());
                }
                continue;
            }
        }

        match session.render_figure(1) {
            Ok(path) => println!("  Figure saved to {}\n", path.display()),
            Err(e) => {
                // The report is still usable without the chart.
                warn!(error = %e, "Figure rendering failed");
                eprintln!("  Could not render the figure: {e}");
            }
        }

        export_loop(&session)?;

        if !Confirm::new()
            .with_prompt("Generate another report?")
            .default(false)
            .interact()?
        {
            return Ok(());
        }
        println!();
    }
}

/// Prompt until the user supplies a complete set of preferences.
fn collect_preferences() -> anyhow::Result<UserPreferences> {
    loop {
        let topic: String = Input::new()
            .with_prompt("What topic do you want to learn about?")
            .allow_empty(true)
            .interact_text()?;
        let goal: String = Input::new()
            .with_prompt("What is your learning objective? (e.g., understand basics)")
            .allow_empty(true)
            .interact_text()?;
        let levels: Vec<&str> = KnowledgeLevel::ALL.iter().map(|l| l.as_str()).collect();
        let level_idx = Select::new()
            .with_prompt("What is your current knowledge level?")
            .items(&levels)
            .default(0)
            .interact()?;

        match UserPreferences::new(&topic, &goal, KnowledgeLevel::ALL[level_idx]) {
            Some(prefs) => return Ok(prefs),
            None => println!("  Topic and objective are both required.\n"),
        }
    }
}

/// Offer export and retry it until it succeeds or the user gives up.
fn export_loop(session: &Session) -> anyhow::Result<()> {
    if !Confirm::new()
        .with_prompt("Export report to PDF?")
        .default(true)
        .interact()?
    {
        return Ok(());
    }

    loop {
        match session.export_report() {
            Ok(path) => {
                println!("  PDF report saved as '{}'\n", path.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("  Export failed: {e}");
                if !Confirm::new()
                    .with_prompt("Try the export again?")
                    .default(true)
                    .interact()?
                {
                    return Ok(());
                }
            }
        }
    }
}
