//! Exploration phases.

use serde::{Deserialize, Serialize};
use wg_core::{ChapterEventResponse, ChoiceOption, Snippet};

/// What the player sees after choosing an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    /// Snippet id, or `chapter:<slug>` for chapters.
    pub encounter_id: String,
    /// Snippet or chapter title.
    pub title: String,
    /// The chosen option's text; `None` for an out-of-range choice.
    pub choice_text: Option<String>,
    /// Status, reward, and refusal lines, in application order.
    pub reward_summaries: Vec<String>,
    /// The autosave tag written to the choice log.
    pub autosave_tag: String,
}

/// The state machine's current phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExplorePhase {
    /// Waiting for the player to explore.
    #[default]
    Idle,
    /// Asking the event engine.
    Loading,
    /// An ordinary snippet is on screen.
    Encounter(Snippet),
    /// A chapter event is on screen.
    Chapter(ChapterEventResponse),
    /// A choice has been resolved.
    Resolution(ResolutionSummary),
    /// Too many encounters since the last rest.
    RestNeeded(u32),
    /// Something went wrong; exploring again retries.
    Error(String),
}

impl ExplorePhase {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Encounter(_) => "in an encounter",
            Self::Chapter(_) => "in a chapter",
            Self::Resolution(_) => "showing a resolution",
            Self::RestNeeded(_) => "resting is needed",
            Self::Error(_) => "in error",
        }
    }

    /// The options the player may pick from.
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            Self::Encounter(snippet) => &snippet.choice_options,
            Self::Chapter(chapter) => chapter
                .primary_snippet()
                .map_or(&[], |s| s.choice_options.as_slice()),
            _ => &[],
        }
    }
}
