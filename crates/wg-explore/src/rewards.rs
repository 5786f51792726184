//! Reward managers.
//!
//! Consequences never touch balances directly; they hand a [`RewardGrant`]
//! to a [`RewardGateway`], which either applies it and returns a short
//! confirmation or refuses with a [`RewardError`]. [`RewardLedger`] is the
//! in-memory gateway used by the CLI and the tests: a seed wallet, a
//! capacity-capped inventory, and a skill book.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wg_core::RewardGrant;

/// Why a grant was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    /// The wallet cannot go below zero.
    #[error("not enough seeds (have {balance}, need {needed})")]
    InsufficientSeeds {
        /// Current balance.
        balance: i64,
        /// Amount requested.
        needed: i64,
    },

    /// The inventory has no room.
    #[error("inventory full ({free} slots free)")]
    InventoryFull {
        /// Slots left.
        free: u32,
    },

    /// Removing more items than are held.
    #[error("only {held} {item} held")]
    MissingItem {
        /// Item id.
        item: String,
        /// Quantity held.
        held: u32,
    },

    /// Any other refusal.
    #[error("{0}")]
    Rejected(String),
}

/// Applies reward grants.
pub trait RewardGateway: Send {
    /// Apply `grant`, returning a confirmation line for the player.
    fn grant(&mut self, grant: &RewardGrant) -> Result<String, RewardError>;
}

/// Seed balance. Never negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    seeds: i64,
}

impl Wallet {
    /// A wallet holding `seeds`.
    pub fn new(seeds: i64) -> Self {
        Self {
            seeds: seeds.max(0),
        }
    }

    /// Current balance.
    pub fn seeds(&self) -> i64 {
        self.seeds
    }

    /// Add (or, if negative, spend) seeds. Returns the new balance.
    pub fn adjust(&mut self, amount: i64) -> Result<i64, RewardError> {
        let next = self.seeds.saturating_add(amount);
        if next < 0 {
            return Err(RewardError::InsufficientSeeds {
                balance: self.seeds,
                needed: amount.saturating_neg(),
            });
        }
        self.seeds = next;
        Ok(next)
    }
}

/// Item counts with a cap on the total number of items held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
    capacity: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(40)
    }
}

impl Inventory {
    /// An empty inventory holding at most `capacity` items.
    pub fn new(capacity: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            capacity,
        }
    }

    /// How many of `item` are held.
    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Total items held.
    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    /// Maximum total items.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Held items, sorted by id.
    pub fn items(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Add `quantity` of `item` (remove if negative). Returns the new
    /// count. Nothing changes on error.
    pub fn adjust(&mut self, item: &str, quantity: i64) -> Result<u32, RewardError> {
        let held = self.count(item);
        if quantity >= 0 {
            let free = self.capacity.saturating_sub(self.total());
            let add = u32::try_from(quantity).unwrap_or(u32::MAX);
            if add > free {
                return Err(RewardError::InventoryFull { free });
            }
            let next = held + add;
            self.items.insert(item.to_string(), next);
            Ok(next)
        } else {
            let remove = u32::try_from(quantity.unsigned_abs()).unwrap_or(u32::MAX);
            if remove > held {
                return Err(RewardError::MissingItem {
                    item: item.to_string(),
                    held,
                });
            }
            let next = held - remove;
            if next == 0 {
                self.items.remove(item);
            } else {
                self.items.insert(item.to_string(), next);
            }
            Ok(next)
        }
    }
}

/// Experience per skill. Floors at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBook {
    experience: BTreeMap<String, i64>,
}

impl SkillBook {
    /// Experience in `skill`.
    pub fn experience(&self, skill: &str) -> i64 {
        self.experience.get(skill).copied().unwrap_or(0)
    }

    /// Skills with experience, sorted by id.
    pub fn skills(&self) -> impl Iterator<Item = (&str, i64)> {
        self.experience.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Add experience. Returns the new total.
    pub fn add(&mut self, skill: &str, amount: i64) -> i64 {
        let entry = self.experience.entry(skill.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount).max(0);
        *entry
    }
}

/// Wallet, inventory, and skills behind one gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    /// Seeds.
    pub wallet: Wallet,
    /// Items.
    pub inventory: Inventory,
    /// Experience.
    pub skills: SkillBook,
}

impl RewardLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `seeds` in the wallet.
    pub fn with_seeds(mut self, seeds: i64) -> Self {
        self.wallet = Wallet::new(seeds);
        self
    }

    /// Wrap for sharing between the exploration loop and a UI.
    pub fn shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }
}

impl RewardGateway for RewardLedger {
    fn grant(&mut self, grant: &RewardGrant) -> Result<String, RewardError> {
        match grant {
            RewardGrant::Seeds { amount } => {
                let balance = self.wallet.adjust(*amount)?;
                Ok(format!("{grant} ({balance} total)"))
            }
            RewardGrant::Item { item, quantity } => {
                let held = self.inventory.adjust(item, *quantity)?;
                Ok(format!("{grant} ({held} held)"))
            }
            RewardGrant::Experience { skill, amount } => {
                let total = self.skills.add(skill, *amount);
                Ok(format!("{grant} ({total} total)"))
            }
            RewardGrant::Other { kind, .. } => Err(RewardError::Rejected(format!(
                "unsupported reward kind '{kind}'"
            ))),
        }
    }
}

impl<G: RewardGateway> RewardGateway for Arc<Mutex<G>> {
    fn grant(&mut self, grant: &RewardGrant) -> Result<String, RewardError> {
        self.lock().grant(grant)
    }
}
