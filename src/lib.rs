//! BetaKit - daily feedback questions and analytics plumbing for beta builds.
//!
//! This library holds the logic behind a "beta feedback" overlay: which
//! one-sentence question to ask today, and where the overlay's analytics events
//! go. Rendering, screenshot detection and notifications live in the host app.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           BetaKit                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │  Question   │──▶│  Selection  │──▶│  Feedback   │        │
//! │  │  Rotation   │   │ (stability) │   │   Session   │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │                           │                 │               │
//! │                           ▼                 ▼               │
//! │                    ┌─────────────┐   ┌─────────────┐        │
//! │                    │ Beta State  │   │ Event Sink  │        │
//! │                    │   (JSON)    │   │ (handlers)  │        │
//! │                    └─────────────┘   └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use betakit::analytics::{attributes, EventSink};
//! use betakit::question::{question_for_day, FeedbackQuestion, ZonedCalendar};
//! use chrono::{TimeZone, Utc};
//!
//! let pool = vec![
//!     FeedbackQuestion::new("q1", "Q1", "H1", "P1"),
//!     FeedbackQuestion::new("q2", "Q2", "H2", "P2"),
//!     FeedbackQuestion::new("q3", "Q3", "H3", "P3"),
//! ];
//! let date = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
//! let question = question_for_day(&pool, date, &ZonedCalendar::utc());
//! assert_eq!(question.id, "q2");
//!
//! let sink = EventSink::new();
//! sink.configure(|name: &str, _: &betakit::analytics::Attributes| println!("{name}"));
//! sink.log_event("TestFlight.Feedback.View", attributes([("questionId", "q2")]));
//! ```

pub mod analytics;
pub mod config;
pub mod feedback;
pub mod question;
pub mod state;

// Re-export key types at crate root for convenience
pub use analytics::{
    create_shared_sink, Attributes, Event, EventHandler, EventSink, SharedEventSink,
};
pub use config::{Config, ConfigError};
pub use feedback::{FeedbackError, FeedbackSession};
pub use question::{
    default_questions, question_for_day, resolve_selection, FeedbackQuestion, QuestionRotator,
    SelectionDecision, StoredSelection, ZonedCalendar,
};
pub use state::{BetaState, StateError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Title of the in-app screenshot prompt.
pub const SCREENSHOT_PROMPT_TITLE: &str = "Want to share quick beta feedback?";

/// Subtitle of the in-app screenshot prompt.
pub const SCREENSHOT_PROMPT_SUBTITLE: &str =
    "Take a screenshot and we'll guide you from there.";

/// Copy shown once to explain screenshot feedback.
pub const SCREENSHOT_TIP: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                        QUICK BETA TIP                            ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  When you take a screenshot, the system lets you share beta      ║
║  feedback directly. A reminder follows your next screenshot.     ║
║                                                                  ║
║  Take a screenshot whenever something feels off or great.        ║
║  After the screenshot you'll see the preview with share options. ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_tip_contents() {
        assert!(SCREENSHOT_TIP.contains("BETA TIP"));
        assert!(SCREENSHOT_TIP.contains("screenshot"));
        assert!(SCREENSHOT_PROMPT_TITLE.ends_with('?'));
    }
}
