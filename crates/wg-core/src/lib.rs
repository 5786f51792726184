//! Core types for Wildgrove: player state, snippets, consequences, and the
//! director state that the exploration loop reads and writes.
//!
//! This crate holds plain data. It knows how to evaluate a gating condition
//! against a player snapshot and how to validate a content pack, but it never
//! decides which encounter comes next or how a consequence is applied.

/// Chapter events: large, director-authored encounter bundles.
pub mod chapter;
/// Snippets, choice options, conditions, and consequence descriptions.
pub mod choice;
/// Adaptive difficulty and playstyle state.
pub mod director;
/// Error types used throughout the crate.
pub mod error;
/// Serializable bundles of snippets and chapter templates.
pub mod pack;
/// The player snapshot owned by the state store.
pub mod player;
/// Millisecond timestamps.
pub mod timestamp;
/// Content pack validation.
pub mod validate;

/// Re-export chapter types.
pub use chapter::{CHAPTER_COMPLETION_PREFIX, ChapterEventResponse, slugify};
/// Re-export choice types.
pub use choice::{ChoiceOption, Condition, Consequence, EffectKind, RewardGrant, Snippet};
/// Re-export director state types.
pub use director::{AiDirectorState, Difficulty, PerformanceStats, PlayStyle, PlaystyleScores};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export content pack types.
pub use pack::{ChapterTemplate, ContentPack};
/// Re-export player types.
pub use player::{ChoiceRecord, PlayerState, QuestStatus, StatusEffect};
/// Re-export the timestamp type.
pub use timestamp::Timestamp;
/// Re-export validation entry point.
pub use validate::{ValidationIssue, validate_pack};
