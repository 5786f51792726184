//! The exploration state machine.
//!
//! ```text
//! Idle ──begin──▶ Loading ──▶ Encounter | Chapter | RestNeeded | Error
//! Encounter | Chapter ──choose──▶ Resolution ──continue──▶ Idle
//! RestNeeded ──rest──▶ Idle
//! Error ──begin──▶ Loading
//! ```
//!
//! Any other call is rejected with [`ExploreError::InvalidTransition`] and
//! changes nothing.

use std::sync::Arc;

use tracing::{info, warn};
use wg_core::{ChapterEventResponse, ChoiceOption, Consequence, PlayerState, Snippet};
use wg_director::AiDirector;

use crate::config::ExploreConfig;
use crate::engine::{DirectorEventEngine, EventEngine, EventResolution};
use crate::error::{ExploreError, ExploreResult};
use crate::history::{ExploreHistory, ExploreHistoryEntry};
use crate::interpreter::ConsequenceInterpreter;
use crate::phase::{ExplorePhase, ResolutionSummary};
use crate::repository::ContentRepository;
use crate::rewards::RewardGateway;
use crate::store::PlayerStore;

/// Drives one exploration session.
pub struct ExplorationMachine {
    store: Arc<dyn PlayerStore>,
    repository: Arc<dyn ContentRepository>,
    engine: Box<dyn EventEngine>,
    director: Arc<AiDirector>,
    interpreter: ConsequenceInterpreter,
    rewards: Box<dyn RewardGateway>,
    config: ExploreConfig,
    phase: ExplorePhase,
    history: ExploreHistory,
}

impl std::fmt::Debug for ExplorationMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorationMachine")
            .field("phase", &self.phase)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

/// The parts of the current encounter that resolution needs.
struct Pending {
    id: String,
    title: String,
    option: Option<ChoiceOption>,
    consequence: Option<Consequence>,
    narrative_tag: Option<String>,
    completion_tag: String,
}

impl Pending {
    fn snippet(snippet: &Snippet, index: usize) -> Self {
        let option = snippet.option(index).cloned();
        let narrative_tag = option.as_ref().map(|o| {
            o.tag
                .clone()
                .unwrap_or_else(|| format!("{}_option_{index}", snippet.id))
        });
        Self {
            id: snippet.id.clone(),
            title: snippet.title.clone(),
            consequence: snippet.consequence_for(index).cloned(),
            option,
            narrative_tag,
            completion_tag: snippet.completion_tag(),
        }
    }

    fn chapter(chapter: &ChapterEventResponse, index: usize) -> Self {
        let primary = chapter.primary_snippet();
        let option = primary.and_then(|s| s.option(index)).cloned();
        let id = chapter.synthetic_id();
        Self {
            narrative_tag: option.as_ref().map(|_| id.clone()),
            id,
            title: chapter.world_event_title.clone(),
            consequence: primary.and_then(|s| s.consequence_for(index)).cloned(),
            option,
            completion_tag: chapter.completion_tag(),
        }
    }
}

impl ExplorationMachine {
    /// Create a machine using the default [`DirectorEventEngine`].
    pub fn new(
        store: Arc<dyn PlayerStore>,
        repository: Arc<dyn ContentRepository>,
        rewards: Box<dyn RewardGateway>,
        config: ExploreConfig,
    ) -> Self {
        let director = Arc::new(AiDirector::new(config.director.clone()));
        let engine = DirectorEventEngine::new(Arc::clone(&repository), Arc::clone(&director), &config);
        Self {
            store,
            repository,
            engine: Box::new(engine),
            director,
            interpreter: ConsequenceInterpreter::new(),
            rewards,
            config,
            phase: ExplorePhase::Idle,
            history: ExploreHistory::new(),
        }
    }

    /// Replace the event engine.
    pub fn with_engine(mut self, engine: impl EventEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// The current phase.
    pub fn phase(&self) -> &ExplorePhase {
        &self.phase
    }

    /// Everything resolved this session.
    pub fn history(&self) -> &ExploreHistory {
        &self.history
    }

    /// The player store.
    pub fn store(&self) -> &Arc<dyn PlayerStore> {
        &self.store
    }

    /// The director shared with the default engine.
    pub fn director(&self) -> &AiDirector {
        &self.director
    }

    /// The active configuration.
    pub fn config(&self) -> &ExploreConfig {
        &self.config
    }

    /// Ask the event engine what comes next. Valid from `Idle` and `Error`.
    ///
    /// Lookup failures land in [`ExplorePhase::Error`]; the call itself
    /// still succeeds.
    pub fn begin_exploration(&mut self) -> ExploreResult<&ExplorePhase> {
        if !matches!(self.phase, ExplorePhase::Idle | ExplorePhase::Error(_)) {
            return Err(self.invalid("begin exploring"));
        }
        self.phase = ExplorePhase::Loading;

        let player = self.store.current();
        let now = self.store.now();
        self.phase = match self.engine.evaluate_next_encounter(&player, now) {
            Ok(EventResolution::Encounter(id)) => match self.repository.snippet(&id) {
                Some(snippet) => ExplorePhase::Encounter(snippet),
                None => {
                    let err = ExploreError::SnippetNotFound(id);
                    warn!(error = %err, "encounter lookup failed");
                    ExplorePhase::Error(err.to_string())
                }
            },
            Ok(EventResolution::ChapterEvent(chapter)) => ExplorePhase::Chapter(chapter),
            Ok(EventResolution::RestRequired) => {
                ExplorePhase::RestNeeded(player.director.events_since_rest)
            }
            Err(err) => {
                warn!(error = %err, "event engine failed");
                ExplorePhase::Error(err.to_string())
            }
        };

        info!(phase = self.phase.name(), "exploration began");
        Ok(&self.phase)
    }

    /// Resolve option `index` of the current encounter or chapter.
    ///
    /// The consequence, the narrative, completion, and autosave tags, and
    /// the director's counters are all written in one store update. An
    /// out-of-range index resolves with no label, consequence, or reward.
    pub fn choose_option(&mut self, index: usize) -> ExploreResult<ResolutionSummary> {
        let pending = match &self.phase {
            ExplorePhase::Encounter(snippet) => Pending::snippet(snippet, index),
            ExplorePhase::Chapter(chapter) => Pending::chapter(chapter, index),
            _ => return Err(self.invalid("choose an option")),
        };
        if pending.option.is_none() {
            warn!(encounter = %pending.id, index, "option index out of range");
        }

        let now = self.store.now();
        let autosave_tag = format!("autosave:{}:{}", pending.id, now.as_millis());
        let style_tag = pending.option.as_ref().and_then(|o| o.tag.clone());

        let interpreter = self.interpreter;
        let director = &self.director;
        let rewards = &mut self.rewards;
        let mut summaries = Vec::new();
        self.store.update(&mut |state: &mut PlayerState| {
            state.prune_expired_statuses(now);
            if let Some(consequence) = &pending.consequence {
                let applied =
                    interpreter.apply(consequence, std::mem::take(state), now, &mut **rewards);
                *state = applied.player;
                summaries = applied.summaries;
            }
            if let Some(tag) = &pending.narrative_tag {
                state.record_choice(tag.as_str(), now);
            }
            state.record_choice(pending.completion_tag.as_str(), now);
            state.record_choice(autosave_tag.as_str(), now);
            director.record_event(&mut state.director, now);
            if let Some(tag) = &style_tag {
                director.record_style_tag(&mut state.director, tag);
            }
        });

        let summary = ResolutionSummary {
            encounter_id: pending.id,
            title: pending.title,
            choice_text: pending.option.map(|o| o.text),
            reward_summaries: summaries,
            autosave_tag,
        };
        info!(
            encounter = %summary.encounter_id,
            autosave = %summary.autosave_tag,
            "encounter resolved"
        );
        self.phase = ExplorePhase::Resolution(summary.clone());
        Ok(summary)
    }

    /// Record the shown resolution in the history and return to `Idle`.
    pub fn continue_after_resolution(&mut self) -> ExploreResult<ExploreHistoryEntry> {
        let summary = match std::mem::take(&mut self.phase) {
            ExplorePhase::Resolution(summary) => summary,
            other => {
                self.phase = other;
                return Err(self.invalid("continue"));
            }
        };
        let entry = ExploreHistoryEntry {
            snippet_id: summary.encounter_id,
            title: summary.title,
            choice_summary: summary.choice_text,
            autosave_tag: summary.autosave_tag,
        };
        self.history.push(entry.clone());
        Ok(entry)
    }

    /// Rest: reset fatigue and apply the configured recovery. Valid from
    /// `RestNeeded`. Returns the recovery summaries.
    pub fn rest(&mut self) -> ExploreResult<Vec<String>> {
        if !matches!(self.phase, ExplorePhase::RestNeeded(_)) {
            return Err(self.invalid("rest"));
        }

        let now = self.store.now();
        let interpreter = self.interpreter;
        let director = &self.director;
        let recovery = &self.config.rest.recovery;
        let rewards = &mut self.rewards;
        let mut summaries = Vec::new();
        self.store.update(&mut |state: &mut PlayerState| {
            director.rest(&mut state.director);
            let applied = interpreter.apply(recovery, std::mem::take(state), now, &mut **rewards);
            *state = applied.player;
            summaries = applied.summaries;
        });

        info!("rested");
        self.phase = ExplorePhase::Idle;
        Ok(summaries)
    }

    fn invalid(&self, operation: &'static str) -> ExploreError {
        let err = ExploreError::InvalidTransition {
            operation,
            phase: self.phase.name(),
        };
        warn!(error = %err, "rejected");
        err
    }
}
