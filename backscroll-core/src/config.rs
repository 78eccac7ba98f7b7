// Settings loaded from a JSON file; every field has a default

use crate::highlight::HighlightOptions;
use crate::locator::DEFAULT_PROBE_OFFSET_Y;
use crate::poll::WaitOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debug_logging: bool,
    /// Path segment that marks a post-detail page, followed by the post id
    pub detail_path_segment: String,
    /// Waiting for the reply composer of the new page to mount
    pub reply_wait: WaitOptions,
    /// Waiting for posts to render at the restored scroll position
    pub posts_wait: WaitOptions,
    pub highlight: HighlightOptions,
    pub probe_offset_y: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            detail_path_segment: "status".to_string(),
            reply_wait: WaitOptions::default(),
            posts_wait: WaitOptions::default().with_interval_ms(100),
            highlight: HighlightOptions::default(),
            probe_offset_y: DEFAULT_PROBE_OFFSET_Y,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reply_wait.max_attempts == 0 || self.posts_wait.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.detail_path_segment.is_empty() || self.detail_path_segment.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "detail_path_segment must be a single path segment, got '{}'",
                self.detail_path_segment
            )));
        }
        if !self.probe_offset_y.is_finite() || self.probe_offset_y < 0.0 {
            return Err(ConfigError::Invalid(
                "probe_offset_y must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug_logging);
        assert_eq!(settings.reply_wait.max_attempts, 20);
        assert_eq!(settings.reply_wait.interval_ms, 50);
        assert_eq!(settings.posts_wait.interval_ms, 100);
        assert_eq!(settings.highlight.hold_ms, 2000);
        assert_eq!(settings.probe_offset_y, 60.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"debug_logging": true, "posts_wait": {"max_attempts": 5}}"#)
                .unwrap();
        assert!(settings.debug_logging);
        assert_eq!(settings.posts_wait.max_attempts, 5);
        assert_eq!(settings.posts_wait.interval_ms, 50);
        assert_eq!(settings.detail_path_segment, "status");
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let err = Settings::from_json(r#"{"reply_wait": {"max_attempts": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_segment() {
        let err = Settings::from_json(r#"{"detail_path_segment": "a/b"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trips_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("backscroll.json");
        let mut settings = Settings::default();
        settings.highlight.hold_ms = 500;
        fs::write(&path, settings.to_json()).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/backscroll.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
