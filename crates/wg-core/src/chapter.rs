use serde::{Deserialize, Serialize};

use crate::choice::Snippet;

/// Prefix of every chapter completion tag in the choice log.
pub const CHAPTER_COMPLETION_PREFIX: &str = "explore_completed_chapter_";

/// A chapter event: framing text plus one or more bundled snippets.
///
/// Only the first bundled snippet is played. Later snippets are carried for
/// multi-stage chapters and are not offered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterEventResponse {
    /// Chapter title, e.g. `Moonlit Assembly`.
    pub world_event_title: String,
    /// Framing text shown before the first snippet.
    pub world_event_summary: String,
    /// Bundled snippets; the first one supplies the options.
    pub snippets: Vec<Snippet>,
}

impl ChapterEventResponse {
    /// Create a chapter response.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        snippets: Vec<Snippet>,
    ) -> Self {
        Self {
            world_event_title: title.into(),
            world_event_summary: summary.into(),
            snippets,
        }
    }

    /// The snippet whose options are offered.
    pub fn primary_snippet(&self) -> Option<&Snippet> {
        self.snippets.first()
    }

    /// The title as a slug.
    pub fn slug(&self) -> String {
        slugify(&self.world_event_title)
    }

    /// Id used in history and the choice log: `chapter:<slug>`.
    pub fn synthetic_id(&self) -> String {
        format!("chapter:{}", self.slug())
    }

    /// The choice-log tag recorded when this chapter is resolved.
    pub fn completion_tag(&self) -> String {
        format!("{CHAPTER_COMPLETION_PREFIX}{}", self.slug())
    }
}

/// Lowercase `text` and collapse every run of non-alphanumeric characters
/// into one underscore, trimming underscores at both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}
