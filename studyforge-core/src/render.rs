//! Report rendering — on-screen markup view and paginated PDF export.
//!
//! The report is never parsed into a document model. Export scans it line by
//! line with a single heading predicate: a line whose trimmed text starts and
//! ends with the `**` bold marker (as a proper pair) renders in bold with the
//! markers stripped; every other line is an independent body paragraph.

use crate::error::ExportError;
use crate::generator::Report;
use genpdf::elements::{Break, Image, Paragraph};
use genpdf::{Alignment, Document, Scale, SimplePageDecorator, fonts, style};
use std::path::Path;
use tracing::{debug, info};

/// The report text prepared for display by a host UI.
///
/// `raw_markup` marks whether the host may interpret the embedded markup.
/// The content is untrusted model output passed through unsanitized; this is
/// a deliberate, documented trust boundary. Hosts rendering text from
/// untrusted sources should construct the view with raw markup disabled.
#[derive(Debug, Clone)]
pub struct MarkupView {
    pub content: String,
    pub raw_markup: bool,
}

/// A classified report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A heading: trimmed line was fully wrapped in `**`, markers stripped.
    Heading(String),
    /// Plain body text, unchanged.
    Body(String),
}

/// Renders a report into display and document artifacts.
pub struct ReportRenderer;

impl ReportRenderer {
    /// Prepare the report for on-screen rendering. The text passes through
    /// unchanged; only the trust flag varies.
    pub fn markup_view(report: &Report, allow_raw_markup: bool) -> MarkupView {
        MarkupView {
            content: report.content.clone(),
            raw_markup: allow_raw_markup,
        }
    }

    /// Classify every line of the report for document layout.
    pub fn classify_lines(content: &str) -> Vec<Line> {
        content.lines().map(Self::classify_line).collect()
    }

    /// Surrounding whitespace is stripped before the marker-pair check, so an
    /// indented `  **X**  ` still counts as a heading; body lines keep their
    /// original whitespace.
    fn classify_line(line: &str) -> Line {
        let trimmed = line.trim();
        // A heading needs a marker pair: `**` alone is not one.
        if trimmed.len() >= 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
            Line::Heading(trimmed.replace("**", ""))
        } else {
            Line::Body(line.to_string())
        }
    }

    /// Export the report to a paginated PDF document.
    ///
    /// Headings render bold; each body line is its own word-wrapped paragraph
    /// (consecutive body lines are never merged). Page breaks are automatic.
    /// If `figure_path` points at an existing file it is appended at the end,
    /// scaled to the printable width, under a centered italic caption. The
    /// caption always reads "Figure 1: Visual Representation" regardless of
    /// the figure number used elsewhere.
    ///
    /// The output file is overwritten. A locked or unwritable file surfaces
    /// as `ExportError::FileLocked`; the report and figure remain untouched
    /// in memory so the caller can retry.
    pub fn export_to_document(
        report: &Report,
        figure_path: Option<&Path>,
        output_path: &Path,
    ) -> Result<(), ExportError> {
        debug!(path = %output_path.display(), "Exporting report to PDF");

        let font_family = load_font_family()?;
        let mut doc = Document::new(font_family);
        doc.set_title("AI Learning Report");

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(15);
        doc.set_page_decorator(decorator);

        let heading_style = style::Style::new().bold().with_font_size(12);
        for line in Self::classify_lines(&report.content) {
            match line {
                Line::Heading(text) => {
                    doc.push(Paragraph::new(style::StyledString::new(
                        text,
                        heading_style,
                    )));
                }
                Line::Body(text) => {
                    if text.trim().is_empty() {
                        doc.push(Break::new(1));
                    } else {
                        doc.push(Paragraph::new(text));
                    }
                }
            }
        }

        if let Some(path) = figure_path.filter(|p| p.exists()) {
            let image = Image::from_path(path).map_err(|e| ExportError::FigureImage {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            doc.push(Break::new(1));
            // The 800px chart decodes to ~68mm at 300dpi; scale it up to
            // roughly the printable width of an A4 page.
            doc.push(
                image
                    .with_alignment(Alignment::Center)
                    .with_scale(Scale::new(2.6, 2.6)),
            );
            doc.push(Paragraph::new(style::StyledString::new(
                "Figure 1: Visual Representation",
                style::Style::new().italic().with_font_size(10),
            ))
            .aligned(Alignment::Center));
        }

        // Create the output file first so a locked/open document is reported
        // distinctly from rendering failures.
        let file = std::fs::File::create(output_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ExportError::FileLocked {
                    path: output_path.to_path_buf(),
                }
            } else {
                ExportError::Io {
                    path: output_path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;

        doc.render(std::io::BufWriter::new(file))
            .map_err(|e| ExportError::Render {
                message: e.to_string(),
            })?;

        info!(path = %output_path.display(), "Report exported");
        Ok(())
    }
}

/// Locate a usable TTF font family, trying common system locations.
fn load_font_family() -> Result<fonts::FontFamily<fonts::FontData>, ExportError> {
    let candidates = [
        ("", "LiberationSans"),
        ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
        ("/usr/share/fonts/liberation", "LiberationSans"),
        ("/usr/share/fonts/truetype/dejavu", "DejaVuSans"),
        ("/System/Library/Fonts", "Helvetica"),
        ("/Library/Fonts", "Arial"),
    ];
    for (dir, family) in candidates {
        if let Ok(fonts) = fonts::from_files(dir, family, None) {
            return Ok(fonts);
        }
    }
    Err(ExportError::FontNotFound)
}
