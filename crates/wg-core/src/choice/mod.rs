//! Snippets and the data they carry.
//!
//! A snippet pairs narrative text with ordered choice options. Each option
//! has a consequence description at the same index, and the snippet as a
//! whole is gated by conditions and location whitelists.

mod condition;
mod consequence;
mod snippet;

pub use condition::Condition;
pub use consequence::{Consequence, EffectKind, RewardGrant, StatusEffectGrant};
pub use snippet::{ChoiceOption, Snippet};
