//! Exploration configuration, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wg_core::Consequence;
use wg_director::DirectorConfig;

use crate::error::{ExploreError, ExploreResult};

/// Top-level exploration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Resolved encounters allowed before a rest is required.
    pub fatigue_threshold: u32,
    /// How many history entries a UI shows by default.
    pub history_display_limit: usize,
    /// When chapters interrupt ordinary encounters.
    pub chapter: ChapterConfig,
    /// What resting does.
    pub rest: RestConfig,
    /// AI Director tuning.
    pub director: DirectorConfig,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            fatigue_threshold: 5,
            history_display_limit: 10,
            chapter: ChapterConfig::default(),
            rest: RestConfig::default(),
            director: DirectorConfig::default(),
        }
    }
}

impl ExploreConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml(toml_str: &str) -> ExploreResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ExploreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn from_file(path: &Path) -> ExploreResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExploreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Reject settings the loop cannot run with.
    pub fn validate(&self) -> ExploreResult<()> {
        if self.fatigue_threshold == 0 {
            return Err(ExploreError::Config(
                "fatigue_threshold must be at least 1".into(),
            ));
        }
        if self.chapter.every_events == 0 || self.chapter.escalated_every_events == 0 {
            return Err(ExploreError::Config(
                "chapter cadence must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Set the fatigue threshold.
    pub fn with_fatigue_threshold(mut self, threshold: u32) -> Self {
        self.fatigue_threshold = threshold;
        self
    }

    /// Set the chapter cadence.
    pub fn with_chapter(mut self, chapter: ChapterConfig) -> Self {
        self.chapter = chapter;
        self
    }
}

/// Chapter cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterConfig {
    /// A chapter is due every this many resolved encounters.
    pub every_events: u32,
    /// Cadence used at HARD and EXPERT.
    pub escalated_every_events: u32,
    /// Choice tags that make a chapter due as soon as they are recorded.
    pub milestone_tags: Vec<String>,
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            every_events: 4,
            escalated_every_events: 2,
            milestone_tags: Vec::new(),
        }
    }
}

impl ChapterConfig {
    /// Add a milestone tag.
    pub fn with_milestone(mut self, tag: impl Into<String>) -> Self {
        self.milestone_tags.push(tag.into());
        self
    }
}

/// Rest behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Applied after the fatigue counter resets.
    pub recovery: Consequence,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            recovery: Consequence::none().with_status("well_rested", 1_800_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ExploreConfig::default();
        assert_eq!(config.fatigue_threshold, 5);
        assert_eq!(config.history_display_limit, 10);
        assert_eq!(config.chapter.every_events, 4);
        assert_eq!(config.chapter.escalated_every_events, 2);
        assert_eq!(config.rest.recovery.status_effects[0].key, "well_rested");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ExploreConfig::from_toml("").unwrap(), ExploreConfig::default());
    }

    #[test]
    fn partial_toml() {
        let config = ExploreConfig::from_toml(
            r#"
fatigue_threshold = 3

[chapter]
every_events = 6
milestone_tags = ["explore_completed_old_oak"]

[rest.recovery]
status_effects = [{ key = "cozy", duration_ms = 600000 }]

[director.thresholds]
min_samples = 8
"#,
        )
        .unwrap();
        assert_eq!(config.fatigue_threshold, 3);
        assert_eq!(config.history_display_limit, 10);
        assert_eq!(config.chapter.every_events, 6);
        assert_eq!(config.chapter.escalated_every_events, 2);
        assert_eq!(config.chapter.milestone_tags, vec!["explore_completed_old_oak"]);
        assert_eq!(config.rest.recovery.status_effects[0].key, "cozy");
        assert_eq!(config.rest.recovery.status_effects[0].duration_ms, 600_000);
        assert_eq!(config.director.thresholds.min_samples, 8);
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = ExploreConfig::from_toml("fatigue_threshold = 0").unwrap_err();
        assert!(matches!(err, ExploreError::Config(_)));
    }

    #[test]
    fn zero_cadence_rejected() {
        assert!(ExploreConfig::from_toml("[chapter]\nevery_events = 0").is_err());
    }

    #[test]
    fn bad_toml_rejected() {
        assert!(ExploreConfig::from_toml("fatigue_threshold = \"many\"").is_err());
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history_display_limit = 3").unwrap();
        let config = ExploreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.history_display_limit, 3);
    }

    #[test]
    fn missing_file() {
        let err = ExploreConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("not/here.toml"));
    }
}
