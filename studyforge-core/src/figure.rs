//! Figure rendering — the illustrative bar chart embedded in the report.
//!
//! The dataset is a constant table of three nanomaterials, independent of the
//! actual topic: the chart is illustrative only. Output is a PNG named after
//! the figure number, overwriting any prior file with that name.

use crate::error::FigureError;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed chart title. The prompt instructs the model to reference a plot
/// with exactly this title in its Visual Aids section.
pub const CHART_TITLE: &str = "Material Strength Comparison";

/// Constant dataset: material name to tensile strength in MPa.
pub const DATASET: [(&str, u32); 3] = [
    ("Carbon Nanotube", 63),
    ("Graphene", 130),
    ("Copper Nanoparticle", 20),
];

const CHART_SIZE: (u32, u32) = (800, 500);
const BAR_COLOR: RGBColor = RGBColor(30, 144, 255);

/// Renders the bar chart to a PNG file in a target directory.
pub struct FigureProducer {
    out_dir: PathBuf,
}

impl FigureProducer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Deterministic filename for a figure number.
    pub fn filename(figure_number: u32) -> String {
        format!("figure_{figure_number}.png")
    }

    /// Render the chart for the given figure number and return the written
    /// path. The dataset label is informational only; the plotted data is
    /// the constant table.
    pub fn render(&self, dataset_label: &str, figure_number: u32) -> Result<PathBuf, FigureError> {
        let path = self.out_dir.join(Self::filename(figure_number));
        self.render_to(dataset_label, &path)?;
        Ok(path)
    }

    /// Render the chart to an explicit path, overwriting any existing file.
    pub fn render_to(&self, dataset_label: &str, path: &Path) -> Result<(), FigureError> {
        debug!(label = dataset_label, path = %path.display(), "Rendering figure");

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| FigureError::Render {
            message: e.to_string(),
        })?;

        let y_max = DATASET.iter().map(|(_, v)| *v).max().unwrap_or(0) + 20;
        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, ("sans-serif", 28).into_font())
            .margin(12)
            .x_label_area_size(44)
            .y_label_area_size(56)
            .build_cartesian_2d((0..DATASET.len()).into_segmented(), 0u32..y_max)
            .map_err(|e| FigureError::Render {
                message: e.to_string(),
            })?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Nanomaterial")
            .y_desc("Strength (MPa)")
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) => DATASET
                    .get(*i)
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(|e| FigureError::Render {
                message: e.to_string(),
            })?;

        chart
            .draw_series(DATASET.iter().enumerate().map(|(i, (_, value))| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0),
                        (SegmentValue::Exact(i + 1), *value),
                    ],
                    BAR_COLOR.filled(),
                )
            }))
            .map_err(|e| FigureError::Render {
                message: e.to_string(),
            })?;

        // Numeric value label above each bar
        chart
            .draw_series(DATASET.iter().enumerate().map(|(i, (_, value))| {
                Text::new(
                    value.to_string(),
                    (SegmentValue::CenterOf(i), value + 4),
                    ("sans-serif", 16).into_font(),
                )
            }))
            .map_err(|e| FigureError::Render {
                message: e.to_string(),
            })?;

        root.present().map_err(|e| FigureError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(())
    }
}
