//! Simulated research-source aggregation.
//!
//! Stands in for real web/academic/video retrieval: every record is derived
//! from fixed templates by substituting the topic. Links are syntactically
//! valid URLs on plausible domains but are never verified to resolve —
//! callers must not assume they do.

use serde::{Deserialize, Serialize};

/// A web or academic reference record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    pub title: String,
    pub link: String,
    pub summary: String,
}

/// A video reference record with a transcript excerpt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoItem {
    pub title: String,
    pub link: String,
    pub transcript: String,
}

/// The full bundle of simulated reference material for one topic.
/// Immutable once produced; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBundle {
    pub web: Vec<SourceItem>,
    pub academic: Vec<SourceItem>,
    pub videos: Vec<VideoItem>,
}

impl SourceBundle {
    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.web.len() + self.academic.len() + self.videos.len()
    }
}

/// Produces a fixed-shape bundle of synthetic sources for a topic.
pub struct SourceAggregator;

impl SourceAggregator {
    /// Gather simulated sources for a topic: two web items, one academic
    /// item, one video. Pure function, no I/O; the caller has already
    /// normalized the topic (trimmed, lower-cased).
    pub fn gather(topic: &str) -> SourceBundle {
        let display = title_case(topic);
        let slug = url_slug(topic);

        SourceBundle {
            web: vec![
                SourceItem {
                    title: format!("{display} Basics Explained"),
                    link: format!("https://www.ibm.com/topics/{slug}"),
                    summary: format!("Introduction to {display} and its applications."),
                },
                SourceItem {
                    title: format!("The Business Side of {display}"),
                    link: format!("https://www.mckinsey.com/search?q={slug}"),
                    summary: format!("Impact of {display} in industries."),
                },
            ],
            academic: vec![SourceItem {
                title: format!("Recent Research in {display}"),
                link: format!("https://scholar.google.com/scholar?q={slug}+2023"),
                summary: format!("Academic insights on {display} from recent studies."),
            }],
            videos: vec![VideoItem {
                title: format!("{display} in 5 Minutes"),
                link: format!("https://www.youtube.com/results?search_query={slug}+introduction"),
                transcript: format!("This video explains key concepts of {display}..."),
            }],
        }
    }
}

/// Upper-case the first letter of every whitespace-separated word.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-case with spaces replaced by `+`, for use in query URLs.
fn url_slug(s: &str) -> String {
    s.to_lowercase().replace(' ', "+")
}
