//! Session context — one run of the report pipeline.
//!
//! A session owns the learner's preferences, the artifacts it has produced so
//! far, and the naming of those artifacts. Sessions are explicit, passable
//! values: nothing here is process-global. By default artifact names are the
//! fixed `figure_1.png` / configured document name, which means concurrent
//! sessions sharing a working directory race on the same paths; callers that
//! need that enable unique per-session names instead.

use crate::config::RetryConfig;
use crate::error::{ExportError, FigureError, LlmError};
use crate::figure::FigureProducer;
use crate::generator::{Report, ReportGenerator};
use crate::preferences::UserPreferences;
use crate::prompt::PromptBuilder;
use crate::render::ReportRenderer;
use crate::sources::{SourceAggregator, SourceBundle};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Context for a single report-generation session.
pub struct Session {
    id: Uuid,
    prefs: UserPreferences,
    artifact_dir: PathBuf,
    document_name: String,
    unique_artifacts: bool,
    started_at: DateTime<Utc>,
    sources: Option<SourceBundle>,
    report: Option<Report>,
    figure_path: Option<PathBuf>,
}

impl Session {
    pub fn new(prefs: UserPreferences, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prefs,
            artifact_dir: artifact_dir.into(),
            document_name: "AI_Learning_Report.pdf".to_string(),
            unique_artifacts: false,
            started_at: Utc::now(),
            sources: None,
            report: None,
            figure_path: None,
        }
    }

    /// Override the exported document's filename.
    pub fn with_document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    /// Derive per-session unique artifact filenames so concurrent sessions
    /// in the same directory cannot collide.
    pub fn with_unique_artifacts(mut self) -> Self {
        self.unique_artifacts = true;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn figure_path(&self) -> Option<&Path> {
        self.figure_path.as_deref()
    }

    /// Short id fragment used to disambiguate artifact names.
    fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    /// Path of the figure file for a figure number.
    pub fn figure_filename(&self, figure_number: u32) -> PathBuf {
        let name = if self.unique_artifacts {
            format!("figure_{}_{}.png", figure_number, self.short_id())
        } else {
            FigureProducer::filename(figure_number)
        };
        self.artifact_dir.join(name)
    }

    /// Path of the exported document.
    pub fn document_filename(&self) -> PathBuf {
        let name = if self.unique_artifacts {
            match self.document_name.rsplit_once('.') {
                Some((stem, ext)) => format!("{}_{}.{}", stem, self.short_id(), ext),
                None => format!("{}_{}", self.document_name, self.short_id()),
            }
        } else {
            self.document_name.clone()
        };
        self.artifact_dir.join(name)
    }

    /// Gather sources, build the prompt, and run the generation call.
    ///
    /// The source bundle and prompt are pure and deterministic; the single
    /// generative call is the only non-deterministic step. On failure no
    /// session state changes and nothing is written to disk.
    pub async fn generate_report(
        &mut self,
        generator: &ReportGenerator,
        retry: &RetryConfig,
    ) -> Result<&Report, LlmError> {
        let sources = SourceAggregator::gather(&self.prefs.topic);
        let prompt = PromptBuilder::build(&self.prefs, &sources);
        debug!(
            session = %self.id,
            topic = %self.prefs.topic,
            prompt_bytes = prompt.len(),
            "Built report prompt"
        );

        let report = generator.generate_with_retry(&prompt, retry).await?;
        info!(session = %self.id, model = %report.model, "Session report ready");

        self.sources = Some(sources);
        Ok(self.report.insert(report))
    }

    /// Render the illustrative figure and remember its path.
    pub fn render_figure(&mut self, figure_number: u32) -> Result<&Path, FigureError> {
        let producer = FigureProducer::new(&self.artifact_dir);
        let path = self.figure_filename(figure_number);
        let label = format!(
            "{} Adoption by Industry",
            crate::sources::title_case(&self.prefs.topic)
        );
        producer.render_to(&label, &path)?;
        Ok(self.figure_path.insert(path))
    }

    /// Export the generated report to the session's document path.
    ///
    /// Overwrites any previous export. On failure the in-memory report and
    /// figure path are left intact so the user can close the open document
    /// and retry.
    pub fn export_report(&self) -> Result<PathBuf, ExportError> {
        let report = self.report.as_ref().ok_or_else(|| ExportError::Render {
            message: "No report has been generated in this session".to_string(),
        })?;
        let output = self.document_filename();
        ReportRenderer::export_to_document(report, self.figure_path.as_deref(), &output)?;
        Ok(output)
    }
}
