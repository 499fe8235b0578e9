//! In-memory match store.
//!
//! Each match lives in its own slot holding the current state, the replay
//! log, the idempotency ledger and the broadcast sender for state pushes.
//!
//! ## Locking
//!
//! - The match table is an `RwLock` held only long enough to look up, insert
//!   or remove a slot. Commands against different matches never contend on
//!   anything else.
//! - Each slot has its own `Mutex`. The ledger test-and-set, the reduction, the
//!   state swap, the replay append and the push all happen under it, so they
//!   become visible together and in acceptance order.
//! - Subscribing takes the snapshot and the receiver under the same mutex, so
//!   a joiner never sees a torn state and never misses a later push.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::broadcast;

use crate::core::{entropy_seed, DomainEvent, Events, GameState, MatchConfig, MatchId, PlayerId, PlayerState};
use crate::rules::InvariantViolation;

use super::error::{DispatchError, Result};
use super::request::GameStateView;

/// Everything recorded for one match.
struct MatchRecord {
    /// State at creation, the base of the replay fold.
    initial: GameState,
    state: GameState,
    replay: Vec<DomainEvent>,
    /// Processed `(player, client_seq)` pairs.
    ledger: FxHashSet<(PlayerId, u64)>,
}

struct MatchSlot {
    record: Mutex<MatchRecord>,
    pushes: broadcast::Sender<GameStateView>,
}

/// A live subscription to a match's state pushes.
#[derive(Debug)]
pub struct Subscription {
    /// State at the moment of joining.
    pub snapshot: GameStateView,
    /// Every state committed after `snapshot`.
    pub receiver: broadcast::Receiver<GameStateView>,
}

/// Result of a committed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub state: GameState,
    pub events: Events,
}

/// Shared table of live matches.
pub struct MatchStore {
    config: MatchConfig,
    matches: RwLock<FxHashMap<MatchId, Arc<MatchSlot>>>,
    /// Matches created so far, used to derive seeds from a configured base.
    created: AtomicU64,
}

impl MatchStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            matches: RwLock::new(FxHashMap::default()),
            created: AtomicU64::new(0),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Number of live matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.read().len()
    }

    /// Check if there are no live matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.read().is_empty()
    }

    /// Check if a match is live.
    #[must_use]
    pub fn contains(&self, id: MatchId) -> bool {
        self.matches.read().contains_key(&id)
    }

    /// Create a match with one fresh player per villain, in the given order.
    ///
    /// Villain names are expected to be validated already.
    pub fn create(&self, villains: &[String]) -> Result<GameState> {
        let mut matches = self.matches.write();
        if matches.len() >= self.config.max_matches {
            return Err(DispatchError::CapacityExceeded(self.config.max_matches));
        }

        let ordinal = self.created.fetch_add(1, Ordering::Relaxed);
        let seed = match self.config.seed {
            Some(base) => base.wrapping_add(ordinal),
            None => entropy_seed(),
        };

        let players = villains.iter().map(|v| PlayerState::new(PlayerId::new(), v.as_str()));
        let state = GameState::new(MatchId::new(), players, seed);

        let (pushes, _) = broadcast::channel(self.config.push_buffer());
        let slot = MatchSlot {
            record: Mutex::new(MatchRecord {
                initial: state.clone(),
                state: state.clone(),
                replay: Vec::new(),
                ledger: FxHashSet::default(),
            }),
            pushes,
        };
        matches.insert(state.match_id, Arc::new(slot));

        Ok(state)
    }

    /// Insert a prepared state as a new match.
    ///
    /// Used to restore snapshots. The state is not validated here; the first
    /// command against it is. A live match with the same ID is never replaced.
    pub fn insert(&self, state: GameState) -> Result<MatchId> {
        let id = state.match_id;
        let mut matches = self.matches.write();
        if matches.contains_key(&id) {
            return Err(DispatchError::MatchExists(id));
        }
        if matches.len() >= self.config.max_matches {
            return Err(DispatchError::CapacityExceeded(self.config.max_matches));
        }

        let (pushes, _) = broadcast::channel(self.config.push_buffer());
        let slot = MatchSlot {
            record: Mutex::new(MatchRecord {
                initial: state.clone(),
                state,
                replay: Vec::new(),
                ledger: FxHashSet::default(),
            }),
            pushes,
        };
        matches.insert(id, Arc::new(slot));

        Ok(id)
    }

    /// Remove a match. Its subscribers see their channel close.
    pub fn remove(&self, id: MatchId) -> bool {
        self.matches.write().remove(&id).is_some()
    }

    fn slot(&self, id: MatchId) -> Result<Arc<MatchSlot>> {
        self.matches
            .read()
            .get(&id)
            .cloned()
            .ok_or(DispatchError::MatchNotFound(id))
    }

    /// Current state of a match.
    pub fn state(&self, id: MatchId) -> Result<GameState> {
        Ok(self.slot(id)?.record.lock().state.clone())
    }

    /// State of a match at creation.
    pub fn initial_state(&self, id: MatchId) -> Result<GameState> {
        Ok(self.slot(id)?.record.lock().initial.clone())
    }

    /// Every event emitted in a match, in order.
    pub fn replay(&self, id: MatchId) -> Result<Vec<DomainEvent>> {
        Ok(self.slot(id)?.record.lock().replay.clone())
    }

    /// Check whether a `(player, client_seq)` pair has been processed.
    pub fn is_processed(&self, id: MatchId, player: PlayerId, client_seq: u64) -> Result<bool> {
        Ok(self.slot(id)?.record.lock().ledger.contains(&(player, client_seq)))
    }

    /// Subscribe to state pushes, starting from the current snapshot.
    pub fn subscribe(&self, id: MatchId) -> Result<Subscription> {
        let slot = self.slot(id)?;
        let record = slot.record.lock();
        Ok(Subscription {
            snapshot: GameStateView::from(&record.state),
            receiver: slot.pushes.subscribe(),
        })
    }

    /// Apply a transition to a match at most once per `(player, client_seq)`.
    ///
    /// Under the match lock: claims the ledger entry (rejecting duplicates),
    /// runs `transition` on the current state, and on success swaps in the
    /// new state, appends the events and pushes the new projection. If the
    /// transition fails nothing changes and the ledger entry is released.
    pub fn commit<F>(&self, id: MatchId, player: PlayerId, client_seq: u64, transition: F) -> Result<Commit>
    where
        F: FnOnce(&GameState) -> std::result::Result<(GameState, Events), InvariantViolation>,
    {
        let slot = self.slot(id)?;
        let mut record = slot.record.lock();

        let key = (player, client_seq);
        if !record.ledger.insert(key) {
            return Err(DispatchError::DuplicateCommand { player, client_seq });
        }

        let (next, events) = match transition(&record.state) {
            Ok(result) => result,
            Err(violation) => {
                record.ledger.remove(&key);
                return Err(violation.into());
            }
        };

        record.replay.extend(events.iter().cloned());
        record.state = next.clone();

        if slot.pushes.send(GameStateView::from(&next)).is_err() {
            tracing::trace!(match_id = %id, "no subscribers for state push");
        }

        Ok(Commit { state: next, events })
    }
}

impl std::fmt::Debug for MatchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchStore")
            .field("config", &self.config)
            .field("matches", &self.len())
            .finish()
    }
}
