//! Locally persisted beta flags and the stored question selection.

use crate::question::{SelectionDecision, StoredSelection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// State that survives between app launches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BetaState {
    /// Question selected for the most recent day it was computed
    pub selection: Option<StoredSelection>,
    /// Whether the user has acknowledged the screenshot tip
    pub has_seen_screenshot_tip: bool,
    /// Whether the feedback prompt has been shown at least once
    pub has_shown_feedback_prompt: bool,
    /// Last time the state was saved
    pub last_updated: Option<DateTime<Utc>>,
}

impl BetaState {
    /// Load state from disk. A missing file yields the default state.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| StateError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| StateError::ParseError(e.to_string()))
    }

    /// Load state, falling back to defaults if the file is unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = ?path, "could not load beta state, starting fresh: {e}");
            Self::default()
        })
    }

    /// Save state to disk, stamping `last_updated`.
    pub fn save(&mut self, path: &Path) -> Result<(), StateError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::IoError(e.to_string()))?;
        }

        self.last_updated = Some(Utc::now());
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StateError::SerializeError(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| StateError::IoError(e.to_string()))
    }

    /// Record a selection decision made for `day_of_year`.
    ///
    /// Returns `true` if the stored selection changed.
    pub fn apply(&mut self, decision: &SelectionDecision, day_of_year: u32) -> bool {
        match decision.to_store(day_of_year) {
            Some(selection) if self.selection.as_ref() != Some(&selection) => {
                self.selection = Some(selection);
                true
            }
            _ => false,
        }
    }

    pub fn should_show_screenshot_tip(&self) -> bool {
        !self.has_seen_screenshot_tip
    }

    pub fn mark_screenshot_tip_seen(&mut self) {
        self.has_seen_screenshot_tip = true;
    }

    pub fn mark_feedback_prompt_shown(&mut self) {
        self.has_shown_feedback_prompt = true;
    }
}

/// State persistence errors.
#[derive(Debug)]
pub enum StateError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::IoError(e) => write!(f, "IO error: {e}"),
            StateError::ParseError(e) => write!(f, "Parse error: {e}"),
            StateError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{resolve_selection, FeedbackQuestion};
    use std::path::PathBuf;

    fn temp_state() -> PathBuf {
        std::env::temp_dir()
            .join(format!("betakit-state-{}", uuid::Uuid::new_v4()))
            .join("state.json")
    }

    fn pool() -> Vec<FeedbackQuestion> {
        vec![
            FeedbackQuestion::new("q1", "Q1", "H1", "P1"),
            FeedbackQuestion::new("q2", "Q2", "H2", "P2"),
        ]
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let state = BetaState::load(&temp_state()).unwrap();
        assert_eq!(state, BetaState::default());
        assert!(state.should_show_screenshot_tip());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_state();
        let mut state = BetaState::default();
        state.mark_screenshot_tip_seen();
        state.selection = Some(StoredSelection::new(2, "q2"));
        state.save(&path).unwrap();

        let loaded = BetaState::load(&path).unwrap();
        assert!(!loaded.should_show_screenshot_tip());
        assert_eq!(loaded.selection, Some(StoredSelection::new(2, "q2")));
        assert!(loaded.last_updated.is_some());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let path = temp_state();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(BetaState::load(&path), Err(StateError::ParseError(_))));
        assert_eq!(BetaState::load_or_default(&path), BetaState::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_apply_only_on_change() {
        let mut state = BetaState::default();

        let first = resolve_selection(state.selection.as_ref(), 1, &pool());
        assert!(state.apply(&first, 1));

        let again = resolve_selection(state.selection.as_ref(), 1, &pool());
        assert!(!again.should_update_storage);
        assert!(!state.apply(&again, 1));

        let next_day = resolve_selection(state.selection.as_ref(), 2, &pool());
        assert!(state.apply(&next_day, 2));
        assert_eq!(state.selection, Some(StoredSelection::new(2, "q2")));
    }
}
