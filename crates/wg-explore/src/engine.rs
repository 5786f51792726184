//! Encounter selection.
//!
//! [`DirectorEventEngine`] decides in this order:
//!
//! 1. Too many encounters since the last rest: [`EventResolution::RestRequired`].
//! 2. A chapter is due and the repository has one for the current
//!    difficulty: [`EventResolution::ChapterEvent`].
//! 3. Otherwise the eligible snippet shown longest ago, with never-shown
//!    snippets first and ties going to repository order.
//!
//! The engine only reads player state.

use std::sync::Arc;

use tracing::{debug, info};
use wg_core::{ChapterEventResponse, PlayerState, Snippet, Timestamp};
use wg_director::AiDirector;

use crate::chapter::{CadencePolicy, ChapterPolicy};
use crate::config::ExploreConfig;
use crate::error::{ExploreError, ExploreResult};
use crate::repository::ContentRepository;

/// What the player meets next.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResolution {
    /// An ordinary snippet, by id.
    Encounter(String),
    /// A chapter event.
    ChapterEvent(ChapterEventResponse),
    /// The player must rest first.
    RestRequired,
}

/// Picks the next encounter.
pub trait EventEngine: Send + Sync {
    /// Decide what `player` meets at `now`.
    fn evaluate_next_encounter(
        &self,
        player: &PlayerState,
        now: Timestamp,
    ) -> ExploreResult<EventResolution>;
}

/// The default engine, driven by the AI Director.
pub struct DirectorEventEngine {
    repository: Arc<dyn ContentRepository>,
    director: Arc<AiDirector>,
    policy: Box<dyn ChapterPolicy>,
    fatigue_threshold: u32,
}

impl std::fmt::Debug for DirectorEventEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorEventEngine")
            .field("fatigue_threshold", &self.fatigue_threshold)
            .finish_non_exhaustive()
    }
}

impl DirectorEventEngine {
    /// Create an engine with the cadence policy from `config`.
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        director: Arc<AiDirector>,
        config: &ExploreConfig,
    ) -> Self {
        Self {
            repository,
            director,
            policy: Box::new(CadencePolicy::new(config.chapter.clone())),
            fatigue_threshold: config.fatigue_threshold,
        }
    }

    /// Replace the chapter policy.
    pub fn with_policy(mut self, policy: impl ChapterPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }
}

impl EventEngine for DirectorEventEngine {
    fn evaluate_next_encounter(
        &self,
        player: &PlayerState,
        now: Timestamp,
    ) -> ExploreResult<EventResolution> {
        let fatigue = player.director.events_since_rest;
        if fatigue >= self.fatigue_threshold {
            debug!(fatigue, threshold = self.fatigue_threshold, "rest required");
            return Ok(EventResolution::RestRequired);
        }

        let eligible = self.repository.find_eligible(player, now);

        let difficulty = self.director.difficulty(&player.director);
        if self.policy.chapter_due(player, difficulty) {
            if let Some(chapter) = self.repository.chapter_event(player, difficulty, now) {
                info!(chapter = %chapter.world_event_title, %difficulty, "chapter event");
                return Ok(EventResolution::ChapterEvent(chapter));
            }
            debug!(%difficulty, "chapter due but none available");
        }

        let snippet = least_recently_shown(&eligible, player).ok_or_else(|| {
            ExploreError::NoEligibleContent {
                location: player.location.clone(),
            }
        })?;
        debug!(snippet = %snippet.id, candidates = eligible.len(), "encounter selected");
        Ok(EventResolution::Encounter(snippet.id.clone()))
    }
}

fn least_recently_shown<'a>(eligible: &'a [Snippet], player: &PlayerState) -> Option<&'a Snippet> {
    eligible
        .iter()
        .enumerate()
        .min_by_key(|(i, s)| (player.last_choice_at(&s.completion_tag()), *i))
        .map(|(_, s)| s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use wg_core::{ChapterTemplate, ChoiceOption, Consequence};

    fn snippet(id: &str) -> Snippet {
        Snippet::new(id, id, "text").with_choice(ChoiceOption::new("go"), Consequence::none())
    }

    fn engine(repo: InMemoryRepository) -> DirectorEventEngine {
        DirectorEventEngine::new(
            Arc::new(repo),
            Arc::new(AiDirector::default()),
            &ExploreConfig::default(),
        )
    }

    fn pick(engine: &DirectorEventEngine, player: &PlayerState) -> EventResolution {
        engine
            .evaluate_next_encounter(player, Timestamp::from_millis(1_000))
            .unwrap()
    }

    #[test]
    fn never_shown_first_then_oldest() {
        let engine = engine(InMemoryRepository::from_snippets(vec![
            snippet("explore_a"),
            snippet("explore_b"),
            snippet("explore_c"),
        ]));
        let mut player = PlayerState::new("garden");
        assert_eq!(pick(&engine, &player), EventResolution::Encounter("explore_a".into()));

        player.record_choice("explore_completed_a", Timestamp::from_millis(10));
        assert_eq!(pick(&engine, &player), EventResolution::Encounter("explore_b".into()));

        player.record_choice("explore_completed_b", Timestamp::from_millis(20));
        player.record_choice("explore_completed_c", Timestamp::from_millis(30));
        assert_eq!(pick(&engine, &player), EventResolution::Encounter("explore_a".into()));

        player.record_choice("explore_completed_a", Timestamp::from_millis(40));
        assert_eq!(pick(&engine, &player), EventResolution::Encounter("explore_b".into()));
    }

    #[test]
    fn fatigue_wins_over_everything() {
        let engine = engine(InMemoryRepository::from_snippets(vec![snippet("explore_a")]));
        let mut player = PlayerState::new("garden");
        player.director.events_since_rest = 5;
        assert_eq!(pick(&engine, &player), EventResolution::RestRequired);

        player.director.events_since_rest = 4;
        assert!(matches!(pick(&engine, &player), EventResolution::Encounter(_)));
    }

    #[test]
    fn nothing_eligible() {
        let engine = engine(InMemoryRepository::from_snippets(vec![
            snippet("explore_a").with_location("pond"),
        ]));
        let err = engine
            .evaluate_next_encounter(&PlayerState::new("garden"), Timestamp::EPOCH)
            .unwrap_err();
        assert!(matches!(err, ExploreError::NoEligibleContent { ref location } if location == "garden"));
    }

    #[test]
    fn chapter_on_cadence() {
        let repo = InMemoryRepository::from_snippets(vec![snippet("explore_a"), snippet("explore_moths")])
            .with_chapter(
                ChapterTemplate::new("Moonlit Assembly", "The moths gather.")
                    .with_snippet("explore_moths"),
            );
        let engine = engine(repo);
        let mut player = PlayerState::new("garden");
        player.director.total_events = 4;
        match pick(&engine, &player) {
            EventResolution::ChapterEvent(chapter) => {
                assert_eq!(chapter.synthetic_id(), "chapter:moonlit_assembly");
            }
            other => panic!("expected chapter, got {other:?}"),
        }

        player.director.total_events = 5;
        assert!(matches!(pick(&engine, &player), EventResolution::Encounter(_)));
    }

    #[test]
    fn chapter_due_without_template_falls_through() {
        let engine = engine(InMemoryRepository::from_snippets(vec![snippet("explore_a")]));
        let mut player = PlayerState::new("garden");
        player.director.total_events = 4;
        assert_eq!(pick(&engine, &player), EventResolution::Encounter("explore_a".into()));
    }

    struct Always;

    impl ChapterPolicy for Always {
        fn chapter_due(&self, _: &PlayerState, _: wg_core::Difficulty) -> bool {
            true
        }
    }

    #[test]
    fn custom_policy() {
        let repo = InMemoryRepository::from_snippets(vec![snippet("explore_a")])
            .with_chapter(ChapterTemplate::new("Dawn", "").with_snippet("explore_a"));
        let engine = engine(repo).with_policy(Always);
        assert!(matches!(
            pick(&engine, &PlayerState::new("garden")),
            EventResolution::ChapterEvent(_)
        ));
    }
}
