//! Consequence descriptions attached to choice options.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The effect kinds this build understands.
///
/// A consequence is keyed by effect kind. Keys outside this set are kept in
/// [`Consequence::unrecognized`] and skipped when the consequence is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Add or refresh timed status effects.
    StatusEffects,
    /// Append tags to the choice log.
    ChoiceTags,
    /// Request currency, experience, or item grants.
    Rewards,
}

impl EffectKind {
    /// Every known kind.
    pub const ALL: [Self; 3] = [Self::StatusEffects, Self::ChoiceTags, Self::Rewards];

    /// The key used in serialized consequences.
    pub fn key(self) -> &'static str {
        match self {
            Self::StatusEffects => "status_effects",
            Self::ChoiceTags => "choice_tags",
            Self::Rewards => "rewards",
        }
    }

    /// Look up a kind by its serialized key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// A status effect to add for a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectGrant {
    /// Status effect key.
    pub key: String,
    /// How long the effect lasts, in milliseconds.
    pub duration_ms: i64,
}

/// A reward request handed to the reward managers.
///
/// Negative magnitudes are penalties. Reward types this build does not know
/// load as [`RewardGrant::Other`] and are passed on untouched; the reward
/// gateway decides whether it can honor them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawReward", into = "RawReward")]
pub enum RewardGrant {
    /// Change the seed balance.
    Seeds {
        /// Signed amount.
        amount: i64,
    },
    /// Change experience in a skill.
    Experience {
        /// Skill id.
        skill: String,
        /// Signed amount.
        amount: i64,
    },
    /// Add or remove items.
    Item {
        /// Item id.
        item: String,
        /// Signed quantity.
        quantity: i64,
    },
    /// A reward type this build does not model, such as a companion bond.
    Other {
        /// The `type` field as written.
        kind: String,
        /// Every other field, verbatim.
        params: BTreeMap<String, serde_json::Value>,
    },
}

impl RewardGrant {
    /// The serialized `type` of this grant.
    pub fn kind(&self) -> &str {
        match self {
            Self::Seeds { .. } => "seeds",
            Self::Experience { .. } => "experience",
            Self::Item { .. } => "item",
            Self::Other { kind, .. } => kind,
        }
    }
}

impl fmt::Display for RewardGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeds { amount } => write!(f, "{amount:+} seeds"),
            Self::Experience { skill, amount } => write!(f, "{amount:+} {skill} XP"),
            Self::Item { item, quantity } => write!(f, "{quantity:+} {item}"),
            Self::Other { kind, .. } => write!(f, "{kind} reward"),
        }
    }
}

/// Wire form of [`RewardGrant`]: the known types, falling back to a bare
/// `type` plus whatever fields came with it.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawReward {
    Known(KnownReward),
    Other {
        #[serde(rename = "type")]
        kind: String,
        #[serde(flatten)]
        params: BTreeMap<String, serde_json::Value>,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownReward {
    Seeds { amount: i64 },
    Experience { skill: String, amount: i64 },
    Item { item: String, quantity: i64 },
}

impl From<RawReward> for RewardGrant {
    fn from(raw: RawReward) -> Self {
        match raw {
            RawReward::Known(KnownReward::Seeds { amount }) => Self::Seeds { amount },
            RawReward::Known(KnownReward::Experience { skill, amount }) => {
                Self::Experience { skill, amount }
            }
            RawReward::Known(KnownReward::Item { item, quantity }) => Self::Item { item, quantity },
            RawReward::Other { kind, params } => Self::Other { kind, params },
        }
    }
}

impl From<RewardGrant> for RawReward {
    fn from(grant: RewardGrant) -> Self {
        match grant {
            RewardGrant::Seeds { amount } => Self::Known(KnownReward::Seeds { amount }),
            RewardGrant::Experience { skill, amount } => {
                Self::Known(KnownReward::Experience { skill, amount })
            }
            RewardGrant::Item { item, quantity } => Self::Known(KnownReward::Item { item, quantity }),
            RewardGrant::Other { kind, params } => Self::Other { kind, params },
        }
    }
}

/// What happens when a choice option is picked.
///
/// Every kind is optional, and the kinds are independent of one another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Consequence {
    /// Status effects to add or refresh.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_effects: Vec<StatusEffectGrant>,
    /// Tags to append to the choice log.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choice_tags: Vec<String>,
    /// Rewards to request from the managers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewards: Vec<RewardGrant>,
    /// Effect kinds this build does not know, preserved verbatim.
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, serde_json::Value>,
}

impl Consequence {
    /// A consequence that does nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a status effect.
    pub fn with_status(mut self, key: impl Into<String>, duration_ms: i64) -> Self {
        self.status_effects.push(StatusEffectGrant {
            key: key.into(),
            duration_ms,
        });
        self
    }

    /// Add a choice-log tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.choice_tags.push(tag.into());
        self
    }

    /// Add a reward request.
    pub fn with_reward(mut self, reward: RewardGrant) -> Self {
        self.rewards.push(reward);
        self
    }

    /// Whether no known effect is present.
    pub fn is_empty(&self) -> bool {
        self.status_effects.is_empty() && self.choice_tags.is_empty() && self.rewards.is_empty()
    }

    /// Keys of effect kinds this build will skip.
    pub fn unrecognized_kinds(&self) -> impl Iterator<Item = &str> {
        self.unrecognized.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_kind_keys() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(EffectKind::from_key("companion_bond"), None);
    }

    #[test]
    fn builder() {
        let c = Consequence::none()
            .with_status("forest_poise", 3_600_000)
            .with_tag("met_owl")
            .with_reward(RewardGrant::Seeds { amount: 5 });

        assert!(!c.is_empty());
        assert_eq!(c.status_effects[0].duration_ms, 3_600_000);
        assert_eq!(c.choice_tags, vec!["met_owl"]);
        assert!(Consequence::none().is_empty());
    }

    #[test]
    fn unknown_kinds_are_kept_aside() {
        let c: Consequence = serde_json::from_str(
            r#"{
                "choice_tags": ["explore_clover_trail"],
                "companion_bond": {"companion": "newt", "amount": 2}
            }"#,
        )
        .unwrap();

        assert_eq!(c.choice_tags, vec!["explore_clover_trail"]);
        assert_eq!(c.unrecognized_kinds().collect::<Vec<_>>(), vec!["companion_bond"]);
    }

    #[test]
    fn reward_display() {
        assert_eq!(RewardGrant::Seeds { amount: 12 }.to_string(), "+12 seeds");
        assert_eq!(RewardGrant::Seeds { amount: -3 }.to_string(), "-3 seeds");
        assert_eq!(
            RewardGrant::Experience {
                skill: "foraging".to_string(),
                amount: 40
            }
            .to_string(),
            "+40 foraging XP"
        );
        assert_eq!(
            RewardGrant::Item {
                item: "acorn_cap".to_string(),
                quantity: 2
            }
            .to_string(),
            "+2 acorn_cap"
        );
    }

    #[test]
    fn unknown_reward_type_is_kept() {
        let r: RewardGrant = serde_json::from_str(
            r#"{"type": "companion_bond", "companion": "newt", "amount": 2}"#,
        )
        .unwrap();
        assert_eq!(r.kind(), "companion_bond");
        assert_eq!(r.to_string(), "companion_bond reward");
        let RewardGrant::Other { params, .. } = &r else {
            panic!("expected an opaque reward, got {r:?}");
        };
        assert_eq!(params["companion"], "newt");

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "companion_bond");
        assert_eq!(json["amount"], 2);
    }

    #[test]
    fn malformed_known_reward_falls_back() {
        let r: RewardGrant =
            serde_json::from_str(r#"{"type": "seeds", "amount": "lots"}"#).unwrap();
        assert_eq!(r.kind(), "seeds");
        assert!(matches!(r, RewardGrant::Other { .. }));
    }

    #[test]
    fn reward_deserializes_tagged() {
        let r: RewardGrant =
            serde_json::from_str(r#"{"type": "item", "item": "dew_drop", "quantity": -1}"#)
                .unwrap();
        assert_eq!(
            r,
            RewardGrant::Item {
                item: "dew_drop".to_string(),
                quantity: -1
            }
        );
    }
}
