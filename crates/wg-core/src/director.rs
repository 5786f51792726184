//! State tracked by the AI Director.
//!
//! These are counters and a cached tier. The rules that turn them into a
//! difficulty or a playstyle live in `wg-director`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Discrete difficulty tier, ordered from easiest to hardest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// The player is struggling.
    Easy,
    /// Baseline.
    #[default]
    Normal,
    /// The player is winning comfortably.
    Hard,
    /// The player is dominating.
    Expert,
}

impl Difficulty {
    /// Whether this tier calls for escalated danger.
    pub fn is_escalated(self) -> bool {
        self >= Self::Hard
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
            Self::Expert => "EXPERT",
        };
        f.write_str(name)
    }
}

/// Playstyle classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    /// Avoids risk.
    Cautious,
    /// Seeks confrontation.
    Aggressive,
    /// Seeks new places and paths.
    Explorer,
    /// Gathers and keeps resources.
    Hoarder,
    /// Talks, trades, and helps.
    Social,
    /// No clear preference.
    Balanced,
}

impl PlayStyle {
    /// The five counted styles, in tie-break order.
    pub const COUNTED: [Self; 5] = [
        Self::Cautious,
        Self::Aggressive,
        Self::Explorer,
        Self::Hoarder,
        Self::Social,
    ];
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cautious => "Cautious",
            Self::Aggressive => "Aggressive",
            Self::Explorer => "Explorer",
            Self::Hoarder => "Hoarder",
            Self::Social => "Social",
            Self::Balanced => "Balanced",
        };
        f.write_str(name)
    }
}

/// Gameplay outcome counters reported by combat and quest subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceStats {
    /// Combats won.
    pub combat_wins: u32,
    /// Combats lost.
    pub combat_losses: u32,
    /// Quests completed.
    pub quest_completions: u32,
    /// Quests failed.
    pub quest_failures: u32,
    /// Player deaths.
    pub deaths: u32,
    /// Total resources gained.
    pub resources_gained: u64,
    /// Total resources lost.
    pub resources_lost: u64,
    /// Running mean of reported health fractions (0.0 to 1.0).
    pub average_health: f64,
    /// Number of health samples folded into `average_health`.
    pub health_samples: u32,
}

impl Default for PerformanceStats {
    fn default() -> Self {
        Self {
            combat_wins: 0,
            combat_losses: 0,
            quest_completions: 0,
            quest_failures: 0,
            deaths: 0,
            resources_gained: 0,
            resources_lost: 0,
            average_health: 1.0,
            health_samples: 0,
        }
    }
}

impl PerformanceStats {
    /// Total combats fought.
    pub fn combats(&self) -> u32 {
        self.combat_wins + self.combat_losses
    }

    /// Total quests finished either way.
    pub fn quests_finished(&self) -> u32 {
        self.quest_completions + self.quest_failures
    }

    /// Combat and quest outcomes observed so far.
    pub fn outcome_samples(&self) -> u32 {
        self.combats() + self.quests_finished()
    }

    /// Fraction of combats won, or `None` before the first combat.
    pub fn win_rate(&self) -> Option<f64> {
        ratio(self.combat_wins, self.combats())
    }

    /// Fraction of finished quests that failed.
    pub fn quest_failure_rate(&self) -> Option<f64> {
        ratio(self.quest_failures, self.quests_finished())
    }

    /// Deaths per combat.
    pub fn death_rate(&self) -> Option<f64> {
        ratio(self.deaths, self.combats())
    }
}

fn ratio(part: u32, whole: u32) -> Option<f64> {
    (whole > 0).then(|| f64::from(part) / f64::from(whole))
}

/// Five independent playstyle counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaystyleScores {
    /// Cautious actions.
    pub cautious: u32,
    /// Aggressive actions.
    pub aggressive: u32,
    /// Exploring actions.
    pub explorer: u32,
    /// Hoarding actions.
    pub hoarder: u32,
    /// Social actions.
    pub social: u32,
}

impl PlaystyleScores {
    /// The counter for `style`. `Balanced` has no counter and reads 0.
    pub fn get(&self, style: PlayStyle) -> u32 {
        match style {
            PlayStyle::Cautious => self.cautious,
            PlayStyle::Aggressive => self.aggressive,
            PlayStyle::Explorer => self.explorer,
            PlayStyle::Hoarder => self.hoarder,
            PlayStyle::Social => self.social,
            PlayStyle::Balanced => 0,
        }
    }

    /// Add one to the counter for `style`. `Balanced` is ignored.
    pub fn increment(&mut self, style: PlayStyle) {
        let counter = match style {
            PlayStyle::Cautious => &mut self.cautious,
            PlayStyle::Aggressive => &mut self.aggressive,
            PlayStyle::Explorer => &mut self.explorer,
            PlayStyle::Hoarder => &mut self.hoarder,
            PlayStyle::Social => &mut self.social,
            PlayStyle::Balanced => return,
        };
        *counter = counter.saturating_add(1);
    }

    /// Each counted style with its score, in tie-break order.
    pub fn counted(&self) -> [(PlayStyle, u32); 5] {
        PlayStyle::COUNTED.map(|style| (style, self.get(style)))
    }
}

/// Everything the AI Director remembers about the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiDirectorState {
    /// Outcome counters.
    pub performance: PerformanceStats,
    /// Playstyle counters.
    pub playstyle: PlaystyleScores,
    /// When the last encounter resolved.
    pub last_event_timestamp: Option<Timestamp>,
    /// Encounters resolved since the last rest.
    pub events_since_rest: u32,
    /// Encounters resolved over the player's lifetime.
    pub total_events: u32,
    /// Tier computed after the most recent update.
    pub current_difficulty: Difficulty,
}
