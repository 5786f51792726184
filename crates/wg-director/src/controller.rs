//! The AI Director: increment operations over [`AiDirectorState`].
//!
//! Combat and quest subsystems call the `record_*` methods; the exploration
//! loop calls [`AiDirector::record_event`], [`AiDirector::record_style_tag`]
//! and [`AiDirector::rest`]. After every change the cached tier is
//! recomputed from the counters.

use tracing::debug;
use wg_core::{AiDirectorState, Difficulty, PlayStyle, Timestamp};

use crate::config::DirectorConfig;
use crate::difficulty::compute_difficulty;
use crate::playstyle::{KeywordStyleMapper, StyleMapper, dominant_style};

/// Adaptive difficulty and playstyle controller.
pub struct AiDirector {
    config: DirectorConfig,
    mapper: Box<dyn StyleMapper>,
}

impl Default for AiDirector {
    fn default() -> Self {
        Self::new(DirectorConfig::default())
    }
}

impl std::fmt::Debug for AiDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiDirector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AiDirector {
    /// Create a director that maps tags with the configured keywords.
    pub fn new(config: DirectorConfig) -> Self {
        let mapper = Box::new(KeywordStyleMapper::new(config.style_keywords.clone()));
        Self { config, mapper }
    }

    /// Replace the tag-to-style mapping.
    pub fn with_mapper(mut self, mapper: impl StyleMapper + 'static) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// The tier the counters call for right now.
    pub fn difficulty(&self, state: &AiDirectorState) -> Difficulty {
        compute_difficulty(&state.performance, &self.config.thresholds)
    }

    /// The player's dominant playstyle right now.
    pub fn dominant_style(&self, state: &AiDirectorState) -> PlayStyle {
        dominant_style(&state.playstyle)
    }

    /// Record a combat result.
    pub fn record_combat(&self, state: &mut AiDirectorState, won: bool) {
        let perf = &mut state.performance;
        if won {
            perf.combat_wins = perf.combat_wins.saturating_add(1);
        } else {
            perf.combat_losses = perf.combat_losses.saturating_add(1);
        }
        self.refresh(state);
    }

    /// Record a finished quest.
    pub fn record_quest(&self, state: &mut AiDirectorState, completed: bool) {
        let perf = &mut state.performance;
        if completed {
            perf.quest_completions = perf.quest_completions.saturating_add(1);
        } else {
            perf.quest_failures = perf.quest_failures.saturating_add(1);
        }
        self.refresh(state);
    }

    /// Record a player death.
    pub fn record_death(&self, state: &mut AiDirectorState) {
        state.performance.deaths = state.performance.deaths.saturating_add(1);
        self.refresh(state);
    }

    /// Record resources gained and lost.
    pub fn record_resources(&self, state: &mut AiDirectorState, gained: u64, lost: u64) {
        let perf = &mut state.performance;
        perf.resources_gained = perf.resources_gained.saturating_add(gained);
        perf.resources_lost = perf.resources_lost.saturating_add(lost);
        self.refresh(state);
    }

    /// Fold a health fraction into the running average. Values outside
    /// `0.0..=1.0` are clamped; NaN is ignored.
    pub fn record_health(&self, state: &mut AiDirectorState, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let sample = fraction.clamp(0.0, 1.0);
        let perf = &mut state.performance;
        let n = f64::from(perf.health_samples);
        perf.average_health = (perf.average_health * n + sample) / (n + 1.0);
        perf.health_samples = perf.health_samples.saturating_add(1);
        self.refresh(state);
    }

    /// Record a resolved encounter.
    pub fn record_event(&self, state: &mut AiDirectorState, now: Timestamp) {
        state.events_since_rest = state.events_since_rest.saturating_add(1);
        state.total_events = state.total_events.saturating_add(1);
        state.last_event_timestamp = Some(now);
        self.refresh(state);
    }

    /// Count a choice tag towards a playstyle. Returns the style credited.
    pub fn record_style_tag(&self, state: &mut AiDirectorState, tag: &str) -> Option<PlayStyle> {
        let style = self.mapper.style_for(tag)?;
        state.playstyle.increment(style);
        debug!(tag, %style, "playstyle credited");
        Some(style)
    }

    /// Reset the fatigue counter.
    pub fn rest(&self, state: &mut AiDirectorState) {
        state.events_since_rest = 0;
        self.refresh(state);
    }

    fn refresh(&self, state: &mut AiDirectorState) {
        let tier = self.difficulty(state);
        if tier != state.current_difficulty {
            debug!(from = %state.current_difficulty, to = %tier, "difficulty changed");
            state.current_difficulty = tier;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> AiDirector {
        AiDirector::default()
    }

    #[test]
    fn combat_updates_tier() {
        let d = director();
        let mut state = AiDirectorState::default();
        for _ in 0..5 {
            d.record_combat(&mut state, false);
        }
        assert_eq!(state.performance.combat_losses, 5);
        assert_eq!(state.current_difficulty, Difficulty::Easy);

        for _ in 0..20 {
            d.record_combat(&mut state, true);
        }
        assert_eq!(state.current_difficulty, Difficulty::Hard);
    }

    #[test]
    fn quests_and_deaths() {
        let d = director();
        let mut state = AiDirectorState::default();
        d.record_quest(&mut state, true);
        d.record_quest(&mut state, false);
        d.record_death(&mut state);
        assert_eq!(state.performance.quest_completions, 1);
        assert_eq!(state.performance.quest_failures, 1);
        assert_eq!(state.performance.deaths, 1);
    }

    #[test]
    fn resources_accumulate() {
        let d = director();
        let mut state = AiDirectorState::default();
        d.record_resources(&mut state, 10, 3);
        d.record_resources(&mut state, 5, 0);
        assert_eq!(state.performance.resources_gained, 15);
        assert_eq!(state.performance.resources_lost, 3);
    }

    #[test]
    fn health_is_a_running_mean() {
        let d = director();
        let mut state = AiDirectorState::default();
        d.record_health(&mut state, 0.5);
        d.record_health(&mut state, 1.0);
        d.record_health(&mut state, 2.0);
        d.record_health(&mut state, f64::NAN);
        let avg = state.performance.average_health;
        assert!((avg - (2.5 / 3.0)).abs() < 1e-9, "got {avg}");
        assert_eq!(state.performance.health_samples, 3);
    }

    #[test]
    fn events_and_rest() {
        let d = director();
        let mut state = AiDirectorState::default();
        d.record_event(&mut state, Timestamp::from_millis(100));
        d.record_event(&mut state, Timestamp::from_millis(200));
        assert_eq!(state.events_since_rest, 2);
        assert_eq!(state.total_events, 2);
        assert_eq!(state.last_event_timestamp, Some(Timestamp::from_millis(200)));

        d.rest(&mut state);
        assert_eq!(state.events_since_rest, 0);
        assert_eq!(state.total_events, 2);
    }

    #[test]
    fn style_tags() {
        let d = director();
        let mut state = AiDirectorState::default();
        assert_eq!(
            d.record_style_tag(&mut state, "explore_clover_trail"),
            Some(PlayStyle::Explorer)
        );
        assert_eq!(d.record_style_tag(&mut state, "nothing_here"), None);
        assert_eq!(state.playstyle.explorer, 1);
        assert_eq!(d.dominant_style(&state), PlayStyle::Balanced);

        for _ in 0..9 {
            d.record_style_tag(&mut state, "scout_ahead");
        }
        assert_eq!(d.dominant_style(&state), PlayStyle::Explorer);
    }

    struct Everything(PlayStyle);

    impl StyleMapper for Everything {
        fn style_for(&self, _tag: &str) -> Option<PlayStyle> {
            Some(self.0)
        }
    }

    #[test]
    fn custom_mapper() {
        let d = director().with_mapper(Everything(PlayStyle::Social));
        let mut state = AiDirectorState::default();
        d.record_style_tag(&mut state, "anything");
        assert_eq!(state.playstyle.social, 1);
    }
}
