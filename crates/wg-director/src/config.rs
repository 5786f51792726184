//! Tuning for the AI Director.

use serde::{Deserialize, Serialize};

/// Threshold bands used to pick a difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyThresholds {
    /// Combat and quest outcomes needed before leaving NORMAL.
    pub min_samples: u32,
    /// Win rate below this drops to EASY.
    pub easy_win_rate: f64,
    /// Deaths per combat at or above this drops to EASY.
    pub easy_death_rate: f64,
    /// Quest failure rate above this drops to EASY.
    pub easy_quest_failure_rate: f64,
    /// Minimum win rate for HARD.
    pub hard_win_rate: f64,
    /// Maximum deaths per combat for HARD.
    pub hard_death_rate: f64,
    /// Maximum quest failure rate for HARD.
    pub hard_quest_failure_rate: f64,
    /// Minimum win rate for EXPERT.
    pub expert_win_rate: f64,
    /// Maximum deaths per combat for EXPERT.
    pub expert_death_rate: f64,
    /// Maximum quest failure rate for EXPERT.
    pub expert_quest_failure_rate: f64,
    /// Minimum average health for EXPERT.
    pub expert_min_health: f64,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        Self {
            min_samples: 5,
            easy_win_rate: 0.40,
            easy_death_rate: 0.25,
            easy_quest_failure_rate: 0.50,
            hard_win_rate: 0.70,
            hard_death_rate: 0.10,
            hard_quest_failure_rate: 0.25,
            expert_win_rate: 0.85,
            expert_death_rate: 0.05,
            expert_quest_failure_rate: 0.10,
            expert_min_health: 0.70,
        }
    }
}

/// Keywords that map a choice tag onto a playstyle.
///
/// A tag is split on anything that is not a letter or digit, and the first
/// style (in the order below) owning one of the pieces wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleKeywords {
    /// Keywords for cautious play.
    pub cautious: Vec<String>,
    /// Keywords for aggressive play.
    pub aggressive: Vec<String>,
    /// Keywords for exploring play.
    pub explorer: Vec<String>,
    /// Keywords for hoarding play.
    pub hoarder: Vec<String>,
    /// Keywords for social play.
    pub social: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

impl Default for StyleKeywords {
    fn default() -> Self {
        Self {
            cautious: words(&[
                "cautious", "careful", "sneak", "hide", "wait", "retreat", "rest", "observe",
            ]),
            aggressive: words(&[
                "aggressive", "fight", "charge", "attack", "confront", "chase", "smash",
            ]),
            explorer: words(&[
                "explorer", "trail", "path", "search", "map", "climb", "wander", "scout",
            ]),
            hoarder: words(&[
                "hoarder", "gather", "collect", "loot", "harvest", "stash", "forage",
            ]),
            social: words(&[
                "social", "talk", "greet", "trade", "help", "ally", "gift", "bargain",
            ]),
        }
    }
}

/// Configuration for the AI Director.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Difficulty bands.
    pub thresholds: DifficultyThresholds,
    /// Tag-to-playstyle keywords.
    pub style_keywords: StyleKeywords,
}

impl DirectorConfig {
    /// Replace the difficulty bands.
    pub fn with_thresholds(mut self, thresholds: DifficultyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
