//! Command intake.
//!
//! The dispatcher owns the match store and a reducer. It validates requests in
//! a fixed order, so a caller always gets the first problem with its request
//! rather than an arbitrary one:
//!
//! 1. blank type
//! 2. nil player
//! 3. negative client sequence
//! 4. unknown match
//! 5. unknown type or missing fields
//! 6. duplicate `(player, client_seq)`
//! 7. reduce, commit, push

use crate::core::{DomainEvent, GameState, MatchConfig, MatchId};
use crate::rules::Reducer;

use super::error::{DispatchError, Result};
use super::request::{CommandAccepted, CreateMatchRequest, CreateMatchResponse, GameStateView, SubmitCommandRequest};
use super::table::{MatchStore, Subscription};

/// Entry point for every match operation.
#[derive(Debug)]
pub struct Dispatcher {
    store: MatchStore,
    reducer: Reducer,
}

impl Dispatcher {
    /// Create a dispatcher with the built-in objectives.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self::with_reducer(config, Reducer::standard())
    }

    /// Create a dispatcher with a custom reducer.
    #[must_use]
    pub fn with_reducer(config: MatchConfig, reducer: Reducer) -> Self {
        Self {
            store: MatchStore::new(config),
            reducer,
        }
    }

    /// Get the underlying store.
    #[must_use]
    pub fn store(&self) -> &MatchStore {
        &self.store
    }

    /// Get the reducer.
    #[must_use]
    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Create a match with one player per villain.
    pub fn create_match(&self, request: &CreateMatchRequest) -> Result<CreateMatchResponse> {
        let Some(villains) = request.normalized_villains() else {
            let error = DispatchError::InvalidVillains;
            tracing::warn!(code = error.code(), villains = ?request.villains, "match creation rejected");
            return Err(error);
        };

        let state = self.store.create(&villains).inspect_err(|error| {
            tracing::warn!(code = error.code(), "match creation rejected");
        })?;

        tracing::info!(
            match_id = %state.match_id,
            players = state.player_count(),
            seed = state.rng.seed,
            "match created"
        );
        Ok(CreateMatchResponse { match_id: state.match_id })
    }

    /// Public projection of a match.
    pub fn state(&self, match_id: MatchId) -> Result<GameStateView> {
        Ok(GameStateView::from(&self.store.state(match_id)?))
    }

    /// Full internal state of a match.
    pub fn snapshot(&self, match_id: MatchId) -> Result<GameState> {
        self.store.state(match_id)
    }

    /// Every event emitted in a match, in acceptance order.
    pub fn replay(&self, match_id: MatchId) -> Result<Vec<DomainEvent>> {
        self.store.replay(match_id)
    }

    /// Run a command submission through intake.
    pub fn submit(&self, match_id: MatchId, request: &SubmitCommandRequest) -> Result<CommandAccepted> {
        let accepted = self.intake(match_id, request);

        match &accepted {
            Ok(ack) => tracing::debug!(
                match_id = %match_id,
                player = %request.player_id,
                client_seq = ack.client_seq,
                events = ?ack.events.iter().map(DomainEvent::name).collect::<Vec<_>>(),
                "command accepted"
            ),
            Err(error @ DispatchError::Invariant(violation)) => tracing::error!(
                match_id = %match_id,
                player = %request.player_id,
                client_seq = request.client_seq,
                code = error.code(),
                %violation,
                "command aborted"
            ),
            Err(error) => tracing::warn!(
                match_id = %match_id,
                player = %request.player_id,
                client_seq = request.client_seq,
                code = error.code(),
                "command rejected"
            ),
        }

        accepted
    }

    fn intake(&self, match_id: MatchId, request: &SubmitCommandRequest) -> Result<CommandAccepted> {
        let kind = request.kind.trim();
        if kind.is_empty() {
            return Err(DispatchError::InvalidType);
        }
        if request.player_id.is_nil() {
            return Err(DispatchError::InvalidPlayer);
        }
        let client_seq =
            u64::try_from(request.client_seq).map_err(|_| DispatchError::InvalidClientSequence(request.client_seq))?;
        if !self.store.contains(match_id) {
            return Err(DispatchError::MatchNotFound(match_id));
        }
        let command = request
            .to_command()
            .ok_or_else(|| DispatchError::UnknownCommandType(kind.to_string()))?;

        let commit = self
            .store
            .commit(match_id, request.player_id, client_seq, |state| self.reducer.reduce(state, &command))?;

        Ok(CommandAccepted {
            match_id,
            client_seq,
            events: commit.events.into_vec(),
        })
    }

    /// Subscribe to a match: current snapshot plus every later push.
    pub fn join(&self, match_id: MatchId) -> Result<Subscription> {
        self.store.subscribe(match_id)
    }

    /// Remove a match and everything recorded for it.
    pub fn close_match(&self, match_id: MatchId) -> Result<()> {
        if !self.store.remove(match_id) {
            return Err(DispatchError::MatchNotFound(match_id));
        }
        tracing::info!(match_id = %match_id, "match closed");
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
