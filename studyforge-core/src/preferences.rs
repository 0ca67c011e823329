//! Learner preferences — topic, goal, and knowledge level.

use serde::{Deserialize, Serialize};

/// Self-assessed knowledge level of the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnowledgeLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl KnowledgeLevel {
    /// All levels, in the order they are offered to the user.
    pub const ALL: [KnowledgeLevel; 3] = [
        KnowledgeLevel::Beginner,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeLevel::Beginner => "Beginner",
            KnowledgeLevel::Intermediate => "Intermediate",
            KnowledgeLevel::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learner preferences collected once per session. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Topic to learn about; trimmed and lower-cased.
    pub topic: String,
    /// Learning objective; trimmed.
    pub goal: String,
    /// Current knowledge level.
    pub level: KnowledgeLevel,
}

impl UserPreferences {
    /// Build normalized preferences from raw user input.
    ///
    /// Returns `None` when topic or goal is empty after trimming — the
    /// pipeline does not start on incomplete input.
    pub fn new(topic: &str, goal: &str, level: KnowledgeLevel) -> Option<Self> {
        let topic = topic.trim().to_lowercase();
        let goal = goal.trim().to_string();
        if topic.is_empty() || goal.is_empty() {
            return None;
        }
        Some(Self { topic, goal, level })
    }
}
