//! Error types for the exploration loop.

use thiserror::Error;

/// Result type for exploration operations.
pub type ExploreResult<T> = Result<T, ExploreError>;

/// Errors that can occur while exploring.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// An operation was called in a phase that does not allow it.
    #[error("cannot {operation} while {phase}")]
    InvalidTransition {
        /// The rejected operation.
        operation: &'static str,
        /// The phase the machine was in.
        phase: &'static str,
    },

    /// The event engine picked a snippet the repository does not have.
    #[error("snippet not found: {0}")]
    SnippetNotFound(String),

    /// Nothing can be offered at the player's location.
    #[error("no eligible encounter at {location}")]
    NoEligibleContent {
        /// The player's location.
        location: String,
    },

    /// Configuration could not be loaded or is out of range.
    #[error("invalid config: {0}")]
    Config(String),
}
