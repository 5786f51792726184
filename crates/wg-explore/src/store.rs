//! The player state store: the single place player state is read and
//! written.
//!
//! Every mutation goes through [`PlayerStore::update`], which runs the
//! closure while holding the store's lock. Multi-step changes (apply a
//! consequence, append tags, bump director counters) happen inside one
//! closure so no reader ever sees them half done.

use parking_lot::Mutex;
use wg_core::{PlayerState, Timestamp};

use crate::clock::Clock;

/// Owner of the authoritative player snapshot and the session clock.
pub trait PlayerStore: Send + Sync {
    /// A copy of the current snapshot.
    fn current(&self) -> PlayerState;

    /// Mutate the snapshot atomically and return the result.
    fn update(&self, apply: &mut dyn FnMut(&mut PlayerState)) -> PlayerState;

    /// The session time. Never goes backwards.
    fn now(&self) -> Timestamp;

    /// The session time for display. Reading it does not affect what
    /// [`PlayerStore::now`] hands out next.
    fn peek_now(&self) -> Timestamp;
}

/// A store that keeps the snapshot in memory.
///
/// `now()` is strictly increasing: when the clock has not moved since the
/// previous call, the store hands out the previous value plus one
/// millisecond, so two resolutions never share an autosave timestamp.
pub struct InMemoryStore {
    state: Mutex<PlayerState>,
    clock: Box<dyn Clock>,
    last_now: Mutex<Option<Timestamp>>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl InMemoryStore {
    /// Create a store holding `initial`, timed by `clock`.
    pub fn new(initial: PlayerState, clock: impl Clock + 'static) -> Self {
        Self {
            state: Mutex::new(initial),
            clock: Box::new(clock),
            last_now: Mutex::new(None),
        }
    }
}

impl PlayerStore for InMemoryStore {
    fn current(&self) -> PlayerState {
        self.state.lock().clone()
    }

    fn update(&self, apply: &mut dyn FnMut(&mut PlayerState)) -> PlayerState {
        let mut state = self.state.lock();
        apply(&mut state);
        state.clone()
    }

    fn now(&self) -> Timestamp {
        let mut last = self.last_now.lock();
        let reading = self.clock.now();
        let next = match *last {
            Some(prev) if reading <= prev => prev.plus_millis(1),
            _ => reading,
        };
        *last = Some(next);
        next
    }

    fn peek_now(&self) -> Timestamp {
        let reading = self.clock.now();
        match *self.last_now.lock() {
            Some(prev) if reading < prev => prev,
            _ => reading,
        }
    }
}
