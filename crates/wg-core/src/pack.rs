use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chapter::{CHAPTER_COMPLETION_PREFIX, ChapterEventResponse, slugify};
use crate::choice::{Condition, Snippet};
use crate::director::Difficulty;
use crate::error::{CoreError, CoreResult};
use crate::player::PlayerState;
use crate::timestamp::Timestamp;

/// A chapter definition that assembles a [`ChapterEventResponse`] on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterTemplate {
    /// Chapter title.
    pub title: String,
    /// Framing text.
    #[serde(default)]
    pub summary: String,
    /// Ids of the bundled snippets, first one played.
    pub snippet_ids: Vec<String>,
    /// Lowest difficulty at which the chapter may appear.
    #[serde(default = "default_min_difficulty")]
    pub min_difficulty: Difficulty,
    /// Conditions that must all hold for the chapter to be offered.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

fn default_min_difficulty() -> Difficulty {
    Difficulty::Easy
}

impl ChapterTemplate {
    /// Create a template available at every difficulty.
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            snippet_ids: Vec::new(),
            min_difficulty: Difficulty::Easy,
            conditions: Vec::new(),
        }
    }

    /// Bundle a snippet.
    pub fn with_snippet(mut self, id: impl Into<String>) -> Self {
        self.snippet_ids.push(id.into());
        self
    }

    /// Require at least `difficulty`.
    pub fn with_min_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.min_difficulty = difficulty;
        self
    }

    /// Add a gating condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The choice-log tag recorded when a chapter built from this template
    /// is resolved.
    pub fn completion_tag(&self) -> String {
        format!("{CHAPTER_COMPLETION_PREFIX}{}", slugify(&self.title))
    }

    /// Whether the chapter may be offered.
    pub fn is_available(&self, player: &PlayerState, difficulty: Difficulty, now: Timestamp) -> bool {
        difficulty >= self.min_difficulty && self.conditions.iter().all(|c| c.evaluate(player, now))
    }
}

/// A serializable bundle of authored content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPack {
    /// Ordinary snippets, in authoring order.
    #[serde(default)]
    pub snippets: Vec<Snippet>,
    /// Chapter templates, in priority order.
    #[serde(default)]
    pub chapters: Vec<ChapterTemplate>,
}

impl ContentPack {
    /// Parse a pack from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a pack from a JSON file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a snippet by id.
    pub fn snippet(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Build a chapter response from a template.
    pub fn assemble(&self, template: &ChapterTemplate) -> CoreResult<ChapterEventResponse> {
        let snippets = template
            .snippet_ids
            .iter()
            .map(|id| {
                self.snippet(id)
                    .cloned()
                    .ok_or_else(|| CoreError::UnknownSnippet(id.clone()))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(ChapterEventResponse::new(
            template.title.clone(),
            template.summary.clone(),
            snippets,
        ))
    }
}
