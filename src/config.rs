//! Configuration for betakit.

use crate::question::{normalize_pool, FeedbackQuestion, ZonedCalendar};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA time zone the day-of-year is computed in
    pub timezone: String,

    /// Optional JSON file holding a custom question pool
    pub questions_path: Option<PathBuf>,

    /// Path for storing state and recorded events
    pub data_path: PathBuf,

    /// Whether CLI sessions append events to the event log
    pub record_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("betakit");

        Self {
            timezone: "UTC".to_string(),
            questions_path: None,
            data_path: data_dir,
            record_events: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("betakit")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Location of the persisted beta state.
    pub fn state_path(&self) -> PathBuf {
        self.data_path.join("state.json")
    }

    /// Location of the recorded event log.
    pub fn events_path(&self) -> PathBuf {
        self.data_path.join("events.jsonl")
    }

    /// Calendar for the configured time zone.
    pub fn calendar(&self) -> Result<ZonedCalendar, ConfigError> {
        ZonedCalendar::from_name(&self.timezone)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// The active question pool: the configured file, or the built-in pool.
    pub fn load_questions(&self) -> Result<Vec<FeedbackQuestion>, ConfigError> {
        let Some(path) = &self.questions_path else {
            return Ok(normalize_pool(&[]));
        };

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let questions: Vec<FeedbackQuestion> = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if questions.is_empty() {
            tracing::warn!(path = ?path, "question file is empty, using built-in questions");
        }
        Ok(normalize_pool(&questions))
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::InvalidValue(e) => write!(f, "Invalid value: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::default_questions;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("betakit-config-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timezone, "UTC");
        assert!(config.questions_path.is_none());
        assert!(config.record_events);
        assert!(config.state_path().ends_with("betakit/state.json"));
        assert!(config.calendar().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"timezone": "Europe/Berlin"}"#).unwrap();
        assert_eq!(config.timezone, "Europe/Berlin");
        assert!(config.record_events);
        assert!(config.calendar().is_ok());
    }

    #[test]
    fn test_invalid_timezone() {
        let config = Config {
            timezone: "Nowhere/Special".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.calendar(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_load_questions_from_file() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("questions.json");
        std::fs::write(
            &path,
            r#"[{"id": "custom", "title": "Custom", "helperText": "Help", "placeholder": "Place"}]"#,
        )
        .unwrap();

        let config = Config {
            questions_path: Some(path),
            ..Config::default()
        };
        let questions = config.load_questions().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "custom");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_empty_question_file_uses_defaults() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("questions.json");
        std::fs::write(&path, "[]").unwrap();

        let config = Config {
            questions_path: Some(path),
            ..Config::default()
        };
        assert_eq!(config.load_questions().unwrap(), default_questions());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = temp_dir();
        let path = dir.join("nested").join("config.json");
        let config = Config {
            timezone: "Asia/Tokyo".to_string(),
            record_events: false,
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = temp_dir().join("config.json");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_ensure_directories_creates_data_path() {
        let dir = temp_dir();
        let config = Config {
            data_path: dir.join("data"),
            ..Config::default()
        };
        assert!(!config.data_path.exists());

        config.ensure_directories().unwrap();
        assert!(config.data_path.is_dir());
        // Already present is fine.
        config.ensure_directories().unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }
}
