//! Lookup-before-compute selection of today's question.
//!
//! Once a question has been shown on a given day, that day keeps returning it
//! even if the pool is later reordered or extended. Storage I/O stays with the
//! caller: this module only decides.

use crate::question::rotation::question_for_day_of_year;
use crate::question::types::{normalize_pool, FeedbackQuestion};
use serde::{Deserialize, Serialize};

/// The last selection the caller persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSelection {
    /// Day-of-year the selection was made for
    pub day_of_year: u32,
    /// Id of the question that was selected
    pub question_id: String,
}

impl StoredSelection {
    pub fn new(day_of_year: u32, question_id: impl Into<String>) -> Self {
        Self {
            day_of_year,
            question_id: question_id.into(),
        }
    }
}

/// Outcome of [`resolve_selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDecision {
    /// The question to show
    pub question: FeedbackQuestion,
    /// Whether the caller should persist `(day, question.id)`
    pub should_update_storage: bool,
}

impl SelectionDecision {
    /// The selection to persist for `day_of_year`, if the decision asks for one.
    pub fn to_store(&self, day_of_year: u32) -> Option<StoredSelection> {
        self.should_update_storage
            .then(|| StoredSelection::new(day_of_year, self.question.id.clone()))
    }
}

/// Decide which question to show on `current_day`.
///
/// A stored selection is reused only when it was made for `current_day`, has a
/// non-empty id, and that id is still in the pool. In every other case the
/// question is recomputed from the rotation and the caller is asked to store
/// it.
///
/// That includes a stored id that has vanished from the pool: the stale entry
/// is deliberately overwritten rather than left in place, so storage always
/// names the question that was actually shown.
pub fn resolve_selection(
    stored: Option<&StoredSelection>,
    current_day: u32,
    pool: &[FeedbackQuestion],
) -> SelectionDecision {
    let source = normalize_pool(pool);

    let reused = stored
        .filter(|s| s.day_of_year == current_day && !s.question_id.is_empty())
        .and_then(|s| source.iter().find(|q| q.id == s.question_id));

    if let Some(question) = reused {
        tracing::debug!(question_id = %question.id, day = current_day, "reusing stored question");
        return SelectionDecision {
            question: question.clone(),
            should_update_storage: false,
        };
    }

    let question = question_for_day_of_year(&source, current_day);
    tracing::debug!(question_id = %question.id, day = current_day, "computed question for day");
    SelectionDecision {
        question,
        should_update_storage: true,
    }
}
