//! Daily feedback question rotation.
//!
//! This module contains:
//! - The `FeedbackQuestion` value and the built-in pool
//! - Day-of-year rotation against an explicit time zone
//! - The lookup-before-compute rule that keeps a day's question stable

pub mod rotation;
pub mod selection;
pub mod types;

// Re-export commonly used types
pub use rotation::{
    question_for_day, question_for_day_of_year, CalendarError, DayCalendar, QuestionRotator,
    ZonedCalendar,
};
pub use selection::{resolve_selection, SelectionDecision, StoredSelection};
pub use types::{default_questions, normalize_pool, FeedbackQuestion, DEFAULT_POOL_SIZE};
