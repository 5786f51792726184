//! AI Director for Wildgrove.
//!
//! Observes combat, quest, and exploration outcomes reported by other
//! subsystems, then derives a difficulty tier and a dominant playstyle on
//! demand. The counters live in [`wg_core::AiDirectorState`] inside the
//! player snapshot; this crate only supplies the rules.

pub mod config;
pub mod controller;
pub mod difficulty;
pub mod playstyle;

pub use config::{DifficultyThresholds, DirectorConfig, StyleKeywords};
pub use controller::AiDirector;
pub use difficulty::compute_difficulty;
pub use playstyle::{
    BALANCED_CLOSENESS_PERCENT, KeywordStyleMapper, MIN_STYLE_SIGNAL, StyleMapper, dominant_style,
};
