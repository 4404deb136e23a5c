//! Feedback sheet lifecycle and the analytics events it emits.

pub mod session;

// Re-export commonly used types
pub use session::{
    FeedbackError, FeedbackSession, Outcome, SkipReason, EVENT_COPY, EVENT_SKIP, EVENT_SUBMIT,
    EVENT_VIEW, SCREEN_NAME,
};
