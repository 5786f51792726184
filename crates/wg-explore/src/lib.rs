//! Exploration loop for Wildgrove.
//!
//! Ties the content repository, the player store, the AI Director, and the
//! consequence interpreter together behind [`ExplorationMachine`], a small
//! state machine driven by four calls: begin, choose, continue, and rest.

pub mod chapter;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod machine;
pub mod phase;
pub mod repository;
pub mod rewards;
pub mod store;

pub use chapter::{CadencePolicy, ChapterPolicy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ChapterConfig, ExploreConfig, RestConfig};
pub use engine::{DirectorEventEngine, EventEngine, EventResolution};
pub use error::{ExploreError, ExploreResult};
pub use history::{ExploreHistory, ExploreHistoryEntry};
pub use interpreter::{Applied, ConsequenceInterpreter};
pub use machine::ExplorationMachine;
pub use phase::{ExplorePhase, ResolutionSummary};
pub use repository::{ContentRepository, InMemoryRepository};
pub use rewards::{Inventory, RewardError, RewardGateway, RewardLedger, SkillBook, Wallet};
pub use store::{InMemoryStore, PlayerStore};
