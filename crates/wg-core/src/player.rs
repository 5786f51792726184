use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::director::AiDirectorState;
use crate::timestamp::Timestamp;

/// One entry of the choice log: a tag and when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    /// The recorded tag (narrative choice, completion marker, or autosave).
    pub tag: String,
    /// When the tag was appended.
    pub at: Timestamp,
}

/// Progress of a quest as seen by snippet conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Accepted but not finished.
    Active,
    /// Finished successfully.
    Completed,
    /// Finished unsuccessfully.
    Failed,
}

/// A keyed, timed status effect on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Effect key, e.g. `forest_poise`.
    pub key: String,
    /// The instant the effect stops applying.
    pub expires_at: Timestamp,
}

impl StatusEffect {
    /// Whether the effect still applies at `now`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }

    /// Milliseconds left at `now`, never negative.
    pub fn remaining_millis(&self, now: Timestamp) -> i64 {
        self.expires_at.millis_since(now).max(0)
    }
}

/// The player snapshot held by the state store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current location id.
    pub location: String,
    /// Current biome, if the location has one.
    #[serde(default)]
    pub biome: Option<String>,
    /// Append-only history of tags, oldest first.
    #[serde(default)]
    pub choice_log: Vec<ChoiceRecord>,
    /// Quest progress keyed by quest id.
    #[serde(default)]
    pub quest_log: BTreeMap<String, QuestStatus>,
    /// Status effects, including expired ones until pruned.
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
    /// Adaptive difficulty and playstyle state.
    #[serde(default)]
    pub director: AiDirectorState,
}

impl PlayerState {
    /// Create a player standing at `location`.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Set the biome.
    pub fn with_biome(mut self, biome: impl Into<String>) -> Self {
        self.biome = Some(biome.into());
        self
    }

    /// Append a tag to the choice log. Duplicates are kept.
    pub fn record_choice(&mut self, tag: impl Into<String>, at: Timestamp) {
        self.choice_log.push(ChoiceRecord {
            tag: tag.into(),
            at,
        });
    }

    /// Whether `tag` appears anywhere in the choice log.
    pub fn has_choice(&self, tag: &str) -> bool {
        self.choice_log.iter().any(|r| r.tag == tag)
    }

    /// How many times `tag` was recorded.
    pub fn choice_count(&self, tag: &str) -> usize {
        self.choice_log.iter().filter(|r| r.tag == tag).count()
    }

    /// When `tag` was most recently recorded.
    pub fn last_choice_at(&self, tag: &str) -> Option<Timestamp> {
        self.choice_log
            .iter()
            .rev()
            .find(|r| r.tag == tag)
            .map(|r| r.at)
    }

    /// Set a quest's status.
    pub fn set_quest(&mut self, quest: impl Into<String>, status: QuestStatus) {
        self.quest_log.insert(quest.into(), status);
    }

    /// A quest's status, if the quest is known.
    pub fn quest_status(&self, quest: &str) -> Option<QuestStatus> {
        self.quest_log.get(quest).copied()
    }

    /// Add a status effect, or extend an existing one.
    ///
    /// Refreshing never shortens: the later expiry wins. Returns the
    /// effective expiry.
    pub fn refresh_status(&mut self, key: impl Into<String>, expires_at: Timestamp) -> Timestamp {
        let key = key.into();
        match self.status_effects.iter_mut().find(|s| s.key == key) {
            Some(existing) => {
                existing.expires_at = existing.expires_at.max(expires_at);
                existing.expires_at
            }
            None => {
                self.status_effects.push(StatusEffect { key, expires_at });
                expires_at
            }
        }
    }

    /// Look up a status effect regardless of expiry.
    pub fn status(&self, key: &str) -> Option<&StatusEffect> {
        self.status_effects.iter().find(|s| s.key == key)
    }

    /// Whether a status effect is present and unexpired at `now`.
    pub fn has_active_status(&self, key: &str, now: Timestamp) -> bool {
        self.status(key).is_some_and(|s| s.is_active(now))
    }

    /// Status effects still applying at `now`.
    pub fn active_statuses(&self, now: Timestamp) -> impl Iterator<Item = &StatusEffect> {
        self.status_effects.iter().filter(move |s| s.is_active(now))
    }

    /// Drop expired status effects. Returns how many were removed.
    pub fn prune_expired_statuses(&mut self, now: Timestamp) -> usize {
        let before = self.status_effects.len();
        self.status_effects.retain(|s| s.is_active(now));
        before - self.status_effects.len()
    }
}
