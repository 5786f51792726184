//! When a chapter event interrupts ordinary encounters.

use wg_core::{CHAPTER_COMPLETION_PREFIX, Difficulty, PlayerState};

use crate::config::ChapterConfig;

/// Decides whether a chapter is due.
pub trait ChapterPolicy: Send + Sync {
    /// Whether the next encounter should be a chapter.
    fn chapter_due(&self, player: &PlayerState, difficulty: Difficulty) -> bool;
}

/// Chapters every N resolved encounters, sooner at HARD and above, and
/// immediately after a milestone tag.
#[derive(Debug, Clone, Default)]
pub struct CadencePolicy {
    config: ChapterConfig,
}

impl CadencePolicy {
    /// Create a policy from config.
    pub fn new(config: ChapterConfig) -> Self {
        Self { config }
    }

    /// Encounters between chapters at `difficulty`.
    pub fn cadence(&self, difficulty: Difficulty) -> u32 {
        if difficulty.is_escalated() {
            self.config.escalated_every_events
        } else {
            self.config.every_events
        }
    }

    fn milestone_pending(&self, player: &PlayerState) -> bool {
        if self.config.milestone_tags.is_empty() {
            return false;
        }
        let since = player
            .choice_log
            .iter()
            .rposition(|r| r.tag.starts_with(CHAPTER_COMPLETION_PREFIX))
            .map_or(0, |i| i + 1);
        player.choice_log[since..]
            .iter()
            .any(|r| self.config.milestone_tags.contains(&r.tag))
    }
}

impl ChapterPolicy for CadencePolicy {
    fn chapter_due(&self, player: &PlayerState, difficulty: Difficulty) -> bool {
        if self.milestone_pending(player) {
            return true;
        }
        let total = player.director.total_events;
        let cadence = self.cadence(difficulty);
        total > 0 && cadence > 0 && total % cadence == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_core::Timestamp;

    fn player_after(events: u32) -> PlayerState {
        let mut player = PlayerState::new("garden");
        player.director.total_events = events;
        player
    }

    #[test]
    fn cadence_by_difficulty() {
        let policy = CadencePolicy::default();
        assert_eq!(policy.cadence(Difficulty::Easy), 4);
        assert_eq!(policy.cadence(Difficulty::Normal), 4);
        assert_eq!(policy.cadence(Difficulty::Hard), 2);
        assert_eq!(policy.cadence(Difficulty::Expert), 2);
    }

    #[test]
    fn due_on_multiples() {
        let policy = CadencePolicy::default();
        assert!(!policy.chapter_due(&player_after(0), Difficulty::Normal));
        assert!(!policy.chapter_due(&player_after(3), Difficulty::Normal));
        assert!(policy.chapter_due(&player_after(4), Difficulty::Normal));
        assert!(policy.chapter_due(&player_after(2), Difficulty::Hard));
        assert!(!policy.chapter_due(&player_after(2), Difficulty::Normal));
    }

    #[test]
    fn milestone_until_next_chapter() {
        let policy =
            CadencePolicy::new(ChapterConfig::default().with_milestone("explore_completed_old_oak"));
        let mut player = player_after(1);
        assert!(!policy.chapter_due(&player, Difficulty::Normal));

        player.record_choice("explore_completed_old_oak", Timestamp::from_millis(1));
        player.record_choice("autosave:explore_old_oak:1", Timestamp::from_millis(1));
        assert!(policy.chapter_due(&player, Difficulty::Normal));

        player.record_choice(
            "explore_completed_chapter_moonlit_assembly",
            Timestamp::from_millis(2),
        );
        assert!(!policy.chapter_due(&player, Difficulty::Normal));
    }
}
