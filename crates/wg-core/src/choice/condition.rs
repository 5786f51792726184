//! Gating predicates for snippets and chapters.

use serde::{Deserialize, Serialize};

use crate::player::{PlayerState, QuestStatus};
use crate::timestamp::Timestamp;

/// A predicate evaluated against the player snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// A tag appears in the choice log.
    HasChoice {
        /// Choice-log tag.
        tag: String,
    },
    /// A tag appears in the choice log at least `count` times.
    ChoiceCountAtLeast {
        /// Choice-log tag.
        tag: String,
        /// Minimum number of occurrences.
        count: usize,
    },
    /// A quest has a specific status.
    QuestIs {
        /// Quest id.
        quest: String,
        /// Expected status.
        status: QuestStatus,
    },
    /// A status effect is active.
    HasStatus {
        /// Status effect key.
        key: String,
    },
    /// The player is at a specific location.
    AtLocation {
        /// Location id.
        location: String,
    },
    /// The player is in a specific biome.
    InBiome {
        /// Biome id.
        biome: String,
    },
    /// Logical NOT.
    Not {
        /// The negated condition.
        condition: Box<Condition>,
    },
    /// Logical AND.
    All {
        /// Conditions that must all hold.
        conditions: Vec<Condition>,
    },
    /// Logical OR.
    Any {
        /// Conditions of which one must hold.
        conditions: Vec<Condition>,
    },
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// Evaluate the condition against the player at `now`.
    pub fn evaluate(&self, player: &PlayerState, now: Timestamp) -> bool {
        match self {
            Condition::HasChoice { tag } => player.has_choice(tag),
            Condition::ChoiceCountAtLeast { tag, count } => player.choice_count(tag) >= *count,
            Condition::QuestIs { quest, status } => player.quest_status(quest) == Some(*status),
            Condition::HasStatus { key } => player.has_active_status(key, now),
            Condition::AtLocation { location } => player.location == *location,
            Condition::InBiome { biome } => player.biome.as_deref() == Some(biome.as_str()),
            Condition::Not { condition } => !condition.evaluate(player, now),
            Condition::All { conditions } => conditions.iter().all(|c| c.evaluate(player, now)),
            Condition::Any { conditions } => conditions.iter().any(|c| c.evaluate(player, now)),
            Condition::Always => true,
        }
    }
}
