//! One presentation of the feedback sheet.
//!
//! A session emits a view event when opened and exactly one completion event:
//! either a submit, or a skip carrying the reason (`skip` or `dismiss`).

use crate::analytics::{attributes, SharedEventSink};
use crate::question::FeedbackQuestion;

/// Emitted when the sheet is shown.
pub const EVENT_VIEW: &str = "TestFlight.Feedback.View";
/// Emitted when an answer is submitted.
pub const EVENT_SUBMIT: &str = "TestFlight.Feedback.Submit";
/// Emitted when the sheet is skipped or dismissed without an answer.
pub const EVENT_SKIP: &str = "TestFlight.Feedback.Skip";
/// Emitted after the answer was copied to the clipboard.
pub const EVENT_COPY: &str = "TestFlight.Feedback.CopyToPasteboard";

/// Screen name attached to every session event.
pub const SCREEN_NAME: &str = "testflight_feedback_sheet";

/// Why a session ended without an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The user tapped "Skip"
    Skip,
    /// The sheet went away without a submit
    Dismiss,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Skip => "skip",
            SkipReason::Dismiss => "dismiss",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Submitted(String),
    Skipped(SkipReason),
}

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// The answer was empty after trimming whitespace
    EmptyAnswer,
    /// The session already ended
    AlreadyCompleted,
}

impl std::fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackError::EmptyAnswer => write!(f, "Answer is empty"),
            FeedbackError::AlreadyCompleted => write!(f, "Feedback session already completed"),
        }
    }
}

impl std::error::Error for FeedbackError {}

/// Tracks a single feedback sheet from appearance to completion.
#[derive(Debug)]
pub struct FeedbackSession {
    question: FeedbackQuestion,
    sink: SharedEventSink,
    outcome: Option<Outcome>,
}

impl FeedbackSession {
    /// Open a session for `question` and log the view event.
    pub fn open(question: FeedbackQuestion, sink: SharedEventSink) -> Self {
        sink.log_event(
            EVENT_VIEW,
            attributes([
                ("questionId", question.id.as_str()),
                ("screen", SCREEN_NAME),
            ]),
        );
        Self {
            question,
            sink,
            outcome: None,
        }
    }

    pub fn question(&self) -> &FeedbackQuestion {
        &self.question
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Submit an answer. Returns the trimmed answer that was recorded.
    ///
    /// A completed session rejects any answer, blank or not, with
    /// [`FeedbackError::AlreadyCompleted`].
    pub fn submit(&mut self, answer: &str) -> Result<String, FeedbackError> {
        if self.is_completed() {
            return Err(FeedbackError::AlreadyCompleted);
        }
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Err(FeedbackError::EmptyAnswer);
        }

        self.outcome = Some(Outcome::Submitted(trimmed.to_string()));
        self.sink.log_event(
            EVENT_SUBMIT,
            attributes([
                ("questionId", self.question.id.as_str()),
                ("answer", trimmed),
                ("screen", SCREEN_NAME),
            ]),
        );
        Ok(trimmed.to_string())
    }

    /// End the session because the user chose to skip.
    pub fn skip(&mut self) -> Result<(), FeedbackError> {
        if self.is_completed() {
            return Err(FeedbackError::AlreadyCompleted);
        }
        self.complete_without_answer(SkipReason::Skip);
        Ok(())
    }

    /// End the session because the sheet went away. No-op after completion.
    pub fn dismiss(&mut self) {
        if !self.is_completed() {
            self.complete_without_answer(SkipReason::Dismiss);
        }
    }

    /// Record that the answer and its context were copied out.
    ///
    /// Does nothing for a blank answer, since there was nothing to copy.
    pub fn record_copy(&self, answer: &str) -> bool {
        if answer.trim().is_empty() {
            return false;
        }
        self.sink.log_event(
            EVENT_COPY,
            attributes([
                ("questionId", self.question.id.as_str()),
                ("screen", SCREEN_NAME),
            ]),
        );
        true
    }

    fn complete_without_answer(&mut self, reason: SkipReason) {
        self.outcome = Some(Outcome::Skipped(reason));
        self.sink.log_event(
            EVENT_SKIP,
            attributes([
                ("reason", reason.as_str()),
                ("questionId", self.question.id.as_str()),
                ("screen", SCREEN_NAME),
            ]),
        );
    }
}
