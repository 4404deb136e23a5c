//! Feedback question values and the built-in question pool.

use serde::{Deserialize, Serialize};

/// A single one-sentence feedback question shown in the beta sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuestion {
    /// Stable identifier, persisted alongside the day it was selected
    pub id: String,
    /// The question itself
    pub title: String,
    /// Short hint rendered under the title
    pub helper_text: String,
    /// Placeholder text for the answer field
    pub placeholder: String,
}

impl FeedbackQuestion {
    /// Create a new question.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        helper_text: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            helper_text: helper_text.into(),
            placeholder: placeholder.into(),
        }
    }
}

/// Number of questions in the built-in pool.
pub const DEFAULT_POOL_SIZE: usize = 3;

/// The built-in pool, used whenever a caller supplies no questions.
pub fn default_questions() -> Vec<FeedbackQuestion> {
    vec![
        FeedbackQuestion::new(
            "openReason",
            "What made you open the app today?",
            "One sentence is perfect.",
            "E.g. \"I needed a nudge to keep going\"",
        ),
        FeedbackQuestion::new(
            "feelNow",
            "How did the app feel when you used it just now?",
            "One sentence is perfect.",
            "E.g. \"It felt calm and motivating\"",
        ),
        FeedbackQuestion::new(
            "goalNow",
            "What's the main thing you're trying to do with the app right now?",
            "One sentence is perfect.",
            "E.g. \"Stay focused on short sessions\"",
        ),
    ]
}

/// Return `pool` unchanged, or the built-in pool if `pool` is empty.
pub fn normalize_pool(pool: &[FeedbackQuestion]) -> Vec<FeedbackQuestion> {
    if pool.is_empty() {
        default_questions()
    } else {
        pool.to_vec()
    }
}
