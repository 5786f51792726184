//! Narrative snippets and their choice options.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::consequence::Consequence;
use crate::player::PlayerState;
use crate::timestamp::Timestamp;

/// Prefix stripped from snippet ids when building completion tags.
const EXPLORE_PREFIX: &str = "explore_";

/// A single option offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// The text shown to the player.
    pub text: String,
    /// Narrative tag logged when this option is picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ChoiceOption {
    /// Create an untagged option.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }

    /// Set the narrative tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A narrative encounter definition.
///
/// Options are addressed by position. `consequences[i]` belongs to
/// `choice_options[i]`; a missing entry means the option has no effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique identifier, e.g. `explore_garden_gate`.
    pub id: String,
    /// Title used for the resolution and the history entry.
    pub title: String,
    /// The narrative prompt.
    pub event_text: String,
    /// Options in display order.
    #[serde(default)]
    pub choice_options: Vec<ChoiceOption>,
    /// Consequences, index-aligned with `choice_options`.
    #[serde(default)]
    pub consequences: Vec<Consequence>,
    /// Conditions that must all hold for the snippet to be offered.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Location whitelist; empty means anywhere.
    #[serde(default)]
    pub allowed_locations: Vec<String>,
    /// Biome whitelist; empty means any biome.
    #[serde(default)]
    pub allowed_biomes: Vec<String>,
}

impl Snippet {
    /// Create a snippet with no options.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        event_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            event_text: event_text.into(),
            choice_options: Vec::new(),
            consequences: Vec::new(),
            conditions: Vec::new(),
            allowed_locations: Vec::new(),
            allowed_biomes: Vec::new(),
        }
    }

    /// Add an option together with its consequence.
    ///
    /// Options added earlier without a consequence are padded with empty
    /// consequences so the new one stays aligned.
    pub fn with_choice(mut self, option: ChoiceOption, consequence: Consequence) -> Self {
        self.consequences
            .resize(self.choice_options.len(), Consequence::none());
        self.choice_options.push(option);
        self.consequences.push(consequence);
        self
    }

    /// Add an option with no consequence entry.
    pub fn with_option(mut self, option: ChoiceOption) -> Self {
        self.choice_options.push(option);
        self
    }

    /// Add a gating condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Restrict to a location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.allowed_locations.push(location.into());
        self
    }

    /// Restrict to a biome.
    pub fn with_biome(mut self, biome: impl Into<String>) -> Self {
        self.allowed_biomes.push(biome.into());
        self
    }

    /// The option at `index`.
    pub fn option(&self, index: usize) -> Option<&ChoiceOption> {
        self.choice_options.get(index)
    }

    /// The consequence for the option at `index`.
    ///
    /// Returns `None` both for an out-of-range index and for an option whose
    /// consequence entry is missing.
    pub fn consequence_for(&self, index: usize) -> Option<&Consequence> {
        if index >= self.choice_options.len() {
            return None;
        }
        self.consequences.get(index)
    }

    /// Whether the location and biome whitelists admit the player.
    pub fn is_allowed_at(&self, location: &str, biome: Option<&str>) -> bool {
        let location_ok =
            self.allowed_locations.is_empty() || self.allowed_locations.iter().any(|l| l == location);
        let biome_ok = self.allowed_biomes.is_empty()
            || biome.is_some_and(|b| self.allowed_biomes.iter().any(|allowed| allowed == b));
        location_ok && biome_ok
    }

    /// Whether the snippet may be offered to `player` at `now`.
    pub fn is_eligible(&self, player: &PlayerState, now: Timestamp) -> bool {
        self.is_allowed_at(&player.location, player.biome.as_deref())
            && self.conditions.iter().all(|c| c.evaluate(player, now))
    }

    /// The id without its `explore_` prefix.
    pub fn completion_key(&self) -> &str {
        self.id.strip_prefix(EXPLORE_PREFIX).unwrap_or(&self.id)
    }

    /// The choice-log tag recorded when this snippet is resolved.
    pub fn completion_tag(&self) -> String {
        format!("explore_completed_{}", self.completion_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Snippet {
        Snippet::new(
            "explore_garden_gate",
            "Garden Gate Recon",
            "A rusted gate creaks in the breeze.",
        )
        .with_choice(
            ChoiceOption::new("Slip through quietly").with_tag("explore_gate_sneak"),
            Consequence::none(),
        )
        .with_choice(
            ChoiceOption::new("Follow the clover trail").with_tag("explore_clover_trail"),
            Consequence::none().with_status("forest_poise", 3_600_000),
        )
    }

    #[test]
    fn snippet_builder() {
        let s = gate();
        assert_eq!(s.choice_options.len(), 2);
        assert_eq!(s.consequences.len(), 2);
        assert_eq!(s.option(1).unwrap().tag.as_deref(), Some("explore_clover_trail"));
    }

    #[test]
    fn consequence_lookup() {
        let s = gate();
        assert!(s.consequence_for(1).is_some());
        assert!(s.consequence_for(2).is_none());
    }

    #[test]
    fn missing_consequence_is_none() {
        let s = Snippet::new("explore_pond", "Pond", "Ripples.")
            .with_option(ChoiceOption::new("Wade in"))
            .with_choice(ChoiceOption::new("Skip a stone"), Consequence::none().with_tag("x"));
        assert_eq!(s.consequence_for(0), Some(&Consequence::none()));
        assert_eq!(s.consequence_for(1).unwrap().choice_tags, vec!["x"]);

        let bare = Snippet::new("explore_log", "Log", "A hollow log.")
            .with_option(ChoiceOption::new("Peek inside"));
        assert_eq!(bare.consequence_for(0), None);
    }

    #[test]
    fn whitelists() {
        let anywhere = gate();
        assert!(anywhere.is_allowed_at("garden", None));

        let garden_only = gate().with_location("garden");
        assert!(garden_only.is_allowed_at("garden", None));
        assert!(!garden_only.is_allowed_at("pond", None));

        let meadow_only = gate().with_biome("meadow");
        assert!(meadow_only.is_allowed_at("garden", Some("meadow")));
        assert!(!meadow_only.is_allowed_at("garden", Some("swamp")));
        assert!(!meadow_only.is_allowed_at("garden", None));
    }

    #[test]
    fn eligibility_checks_conditions() {
        let s = gate().with_condition(Condition::HasChoice {
            tag: "found_key".to_string(),
        });
        let mut player = PlayerState::new("garden");
        let now = Timestamp::from_millis(0);

        assert!(!s.is_eligible(&player, now));
        player.record_choice("found_key", now);
        assert!(s.is_eligible(&player, now));
    }

    #[test]
    fn completion_tag() {
        assert_eq!(gate().completion_tag(), "explore_completed_garden_gate");
        let plain = Snippet::new("mossy_stump", "Stump", "");
        assert_eq!(plain.completion_tag(), "explore_completed_mossy_stump");
    }
}
