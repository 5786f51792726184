//! Difficulty tier computation.
//!
//! The tier is a pure function of the performance counters. It is computed
//! from scratch every time so it never drifts from the counters it
//! summarizes.

use wg_core::{Difficulty, PerformanceStats};

use crate::config::DifficultyThresholds;

/// Pick a difficulty tier for `stats`.
///
/// Fewer than `min_samples` combat and quest outcomes keeps the player at
/// NORMAL. Missing rates count as neutral: a win rate of one half and no
/// failures.
pub fn compute_difficulty(stats: &PerformanceStats, t: &DifficultyThresholds) -> Difficulty {
    if stats.outcome_samples() < t.min_samples {
        return Difficulty::Normal;
    }

    let win_rate = stats.win_rate().unwrap_or(0.5);
    let death_rate = stats.death_rate().unwrap_or(0.0);
    let failure_rate = stats.quest_failure_rate().unwrap_or(0.0);

    if win_rate < t.easy_win_rate
        || death_rate >= t.easy_death_rate
        || failure_rate > t.easy_quest_failure_rate
    {
        return Difficulty::Easy;
    }

    if win_rate >= t.expert_win_rate
        && death_rate <= t.expert_death_rate
        && failure_rate <= t.expert_quest_failure_rate
        && stats.average_health >= t.expert_min_health
    {
        return Difficulty::Expert;
    }

    if win_rate >= t.hard_win_rate
        && death_rate <= t.hard_death_rate
        && failure_rate <= t.hard_quest_failure_rate
    {
        return Difficulty::Hard;
    }

    Difficulty::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(wins: u32, losses: u32, deaths: u32) -> PerformanceStats {
        PerformanceStats {
            combat_wins: wins,
            combat_losses: losses,
            deaths,
            ..PerformanceStats::default()
        }
    }

    fn tier(s: &PerformanceStats) -> Difficulty {
        compute_difficulty(s, &DifficultyThresholds::default())
    }

    #[test]
    fn too_few_samples_is_normal() {
        assert_eq!(tier(&stats(4, 0, 0)), Difficulty::Normal);
        assert_eq!(tier(&stats(0, 4, 4)), Difficulty::Normal);
    }

    #[test]
    fn losing_is_easy() {
        assert_eq!(tier(&stats(1, 4, 0)), Difficulty::Easy);
    }

    #[test]
    fn dying_is_easy() {
        // 80% wins but one death every four fights.
        assert_eq!(tier(&stats(8, 2, 3)), Difficulty::Easy);
    }

    #[test]
    fn failing_quests_is_easy() {
        let s = PerformanceStats {
            quest_completions: 1,
            quest_failures: 4,
            ..PerformanceStats::default()
        };
        assert_eq!(tier(&s), Difficulty::Easy);
    }

    #[test]
    fn middling_is_normal() {
        assert_eq!(tier(&stats(6, 4, 0)), Difficulty::Normal);
    }

    #[test]
    fn winning_is_hard() {
        assert_eq!(tier(&stats(8, 2, 1)), Difficulty::Hard);
    }

    #[test]
    fn dominating_is_expert() {
        assert_eq!(tier(&stats(19, 1, 0)), Difficulty::Expert);
    }

    #[test]
    fn low_health_blocks_expert() {
        let mut s = stats(19, 1, 0);
        s.average_health = 0.3;
        assert_eq!(tier(&s), Difficulty::Hard);
    }

    #[test]
    fn quests_alone_use_neutral_win_rate() {
        let s = PerformanceStats {
            quest_completions: 10,
            ..PerformanceStats::default()
        };
        assert_eq!(tier(&s), Difficulty::Normal);
    }
}
