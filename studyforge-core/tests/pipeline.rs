//! End-to-end pipeline tests with a stubbed LLM provider.

use std::sync::Arc;

use studyforge_core::config::RetryConfig;
use studyforge_core::error::{ExportError, FigureError, LlmError};
use studyforge_core::figure::FigureProducer;
use studyforge_core::llm::MockLlmProvider;
use studyforge_core::preferences::{KnowledgeLevel, UserPreferences};
use studyforge_core::prompt::PromptBuilder;
use studyforge_core::render::{Line, ReportRenderer};
use studyforge_core::session::Session;
use studyforge_core::sources::SourceAggregator;
use studyforge_core::ReportGenerator;

const FIXED_COMPLETION: &str = "**Introduction**\nML is...\n**References**\n1. ...";

fn beginner_prefs() -> UserPreferences {
    UserPreferences::new(
        "machine learning",
        "understand basics",
        KnowledgeLevel::Beginner,
    )
    .unwrap()
}

#[test]
fn sources_feed_the_prompt_verbatim() {
    let prefs = beginner_prefs();
    let bundle = SourceAggregator::gather(&prefs.topic);

    // Four items, each carrying the normalized topic in its text fields.
    assert_eq!(bundle.item_count(), 4);
    for item in bundle.web.iter().chain(bundle.academic.iter()) {
        assert!(item.title.to_lowercase().contains("machine learning"));
    }
    assert!(bundle.videos[0]
        .transcript
        .to_lowercase()
        .contains("machine learning"));

    let prompt = PromptBuilder::build(&prefs, &bundle);
    for item in bundle.web.iter().chain(bundle.academic.iter()) {
        assert!(prompt.contains(&item.title));
        assert!(prompt.contains(&item.summary));
    }
    assert!(prompt.contains(&bundle.videos[0].transcript));
}

#[tokio::test]
async fn generated_report_classifies_bold_blocks_in_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let provider = Arc::new(MockLlmProvider::with_response(FIXED_COMPLETION));
    let generator = ReportGenerator::new(provider);

    let mut session = Session::new(beginner_prefs(), dir.path());
    let report = session
        .generate_report(&generator, &RetryConfig::default())
        .await
        .unwrap();
    assert_eq!(report.content, FIXED_COMPLETION);

    let headings: Vec<_> = ReportRenderer::classify_lines(&report.content)
        .into_iter()
        .filter_map(|line| match line {
            Line::Heading(text) => Some(text),
            Line::Body(_) => None,
        })
        .collect();
    assert_eq!(headings, vec!["Introduction", "References"]);
}

#[tokio::test]
async fn repeated_classification_is_stable_for_export() {
    // Exporting twice with the same report must lay out the same blocks;
    // the classification layer is where that layout is decided.
    let provider = Arc::new(MockLlmProvider::with_response(FIXED_COMPLETION));
    let generator = ReportGenerator::new(provider);
    let dir = tempfile::TempDir::new().unwrap();

    let mut session = Session::new(beginner_prefs(), dir.path());
    let report = session
        .generate_report(&generator, &RetryConfig::default())
        .await
        .unwrap();

    let first = ReportRenderer::classify_lines(&report.content);
    let second = ReportRenderer::classify_lines(&report.content);
    assert_eq!(first, second);
}

#[tokio::test]
async fn auth_failure_writes_no_artifacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let provider = Arc::new(MockLlmProvider::with_error(|| LlmError::AuthFailed {
        provider: "stub".to_string(),
    }));
    let generator = ReportGenerator::new(provider);

    let mut session = Session::new(beginner_prefs(), dir.path());
    let result = session
        .generate_report(&generator, &RetryConfig::default())
        .await;
    assert!(matches!(result, Err(LlmError::AuthFailed { .. })));

    // The failed pipeline produced nothing on disk.
    assert!(!dir.path().join("figure_1.png").exists());
    assert!(!dir.path().join("AI_Learning_Report.pdf").exists());
    assert!(session.report().is_none());

    // Exporting in this state is an error, not a crash or an empty file.
    assert!(session.export_report().is_err());
    assert!(!dir.path().join("AI_Learning_Report.pdf").exists());
}

#[test]
fn figure_file_lands_at_deterministic_path_and_is_overwritten() {
    let dir = tempfile::TempDir::new().unwrap();
    let producer = FigureProducer::new(dir.path());

    let path = match producer.render("Machine Learning Adoption by Industry", 1) {
        Ok(path) => path,
        // Chart text needs a system font; skip where none is installed.
        Err(FigureError::Render { .. }) => return,
        Err(e) => panic!("unexpected figure error: {e}"),
    };
    assert_eq!(path, dir.path().join("figure_1.png"));
    assert!(path.exists());

    let first = std::fs::read(&path).unwrap();
    assert!(first.starts_with(&[0x89, b'P', b'N', b'G']));

    // A second render with the same inputs overwrites the same file with
    // the same pixels.
    producer
        .render("Machine Learning Adoption by Industry", 1)
        .unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn export_overwrites_the_same_document_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let provider = Arc::new(MockLlmProvider::with_response(FIXED_COMPLETION));
    let generator = ReportGenerator::new(provider);

    let mut session = Session::new(beginner_prefs(), dir.path());
    session
        .generate_report(&generator, &RetryConfig::default())
        .await
        .unwrap();

    // Pre-existing content at the output path must be replaced, not appended.
    let out = dir.path().join("AI_Learning_Report.pdf");
    std::fs::write(&out, b"stale").unwrap();

    match session.export_report() {
        Ok(path) => assert_eq!(path, out),
        // No usable system font; nothing further to exercise here.
        Err(ExportError::FontNotFound) => return,
        Err(e) => panic!("unexpected export error: {e}"),
    }
    let first = std::fs::read(&out).unwrap();
    assert!(first.starts_with(b"%PDF"));

    let again = session.export_report().unwrap();
    assert_eq!(again, out);
    let second = std::fs::read(&out).unwrap();
    assert!(second.starts_with(b"%PDF"));
    assert!(!second.is_empty());
}

#[tokio::test]
async fn prompt_is_identical_across_sessions_with_same_input() {
    let prefs_a = beginner_prefs();
    let prefs_b = beginner_prefs();
    let prompt_a = PromptBuilder::build(&prefs_a, &SourceAggregator::gather(&prefs_a.topic));
    let prompt_b = PromptBuilder::build(&prefs_b, &SourceAggregator::gather(&prefs_b.topic));
    assert_eq!(prompt_a, prompt_b);
}
