//! A single client connection.
//!
//! ## Delivery order
//!
//! Messages queued directly on the connection (join snapshots, rejections)
//! are delivered first, then pending pushes from each joined match. Within a
//! match, pushes arrive in acceptance order.
//!
//! A connection that falls more than the broadcast capacity behind skips the
//! states it missed and resumes from the oldest one still buffered. Each push
//! is a full snapshot, so the next one delivered is still complete.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError};
use uuid::Uuid;

use crate::core::MatchId;
use crate::store::{CommandAccepted, DispatchError, Dispatcher, GameStateView, Problem, SubmitCommandRequest};

/// Connection identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conn({})", self.0)
    }
}

/// Message delivered to a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Full state of a joined match.
    State(GameStateView),
    /// One of this connection's commands was rejected.
    CommandRejected(Problem),
}

impl ServerMessage {
    /// Get the state, if this is a state push.
    #[must_use]
    pub fn as_state(&self) -> Option<&GameStateView> {
        match self {
            Self::State(view) => Some(view),
            Self::CommandRejected(_) => None,
        }
    }

    /// Get the problem, if this is a rejection.
    #[must_use]
    pub fn as_rejection(&self) -> Option<&Problem> {
        match self {
            Self::CommandRejected(problem) => Some(problem),
            Self::State(_) => None,
        }
    }
}

/// A client connection attached to a dispatcher.
pub struct Connection {
    id: ConnectionId,
    dispatcher: Arc<Dispatcher>,
    outbox: VecDeque<ServerMessage>,
    groups: FxHashMap<MatchId, broadcast::Receiver<GameStateView>>,
}

impl Connection {
    /// Open a connection.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            id: ConnectionId::new(),
            dispatcher,
            outbox: VecDeque::new(),
            groups: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Check if this connection receives pushes for a match.
    #[must_use]
    pub fn is_joined(&self, match_id: MatchId) -> bool {
        self.groups.contains_key(&match_id)
    }

    /// Matches this connection has joined.
    pub fn joined(&self) -> impl Iterator<Item = MatchId> + '_ {
        self.groups.keys().copied()
    }

    /// Join a match group.
    ///
    /// Queues the current snapshot and subscribes to later pushes. Joining an
    /// unknown match queues a `match.not_found` rejection instead. Joining
    /// again restarts from a fresh snapshot.
    pub fn join_match(&mut self, match_id: MatchId) {
        match self.dispatcher.join(match_id) {
            Ok(subscription) => {
                tracing::debug!(connection = %self.id, match_id = %match_id, "joined match");
                self.outbox.push_back(ServerMessage::State(subscription.snapshot));
                self.groups.insert(match_id, subscription.receiver);
            }
            Err(error) => self.reject(&error),
        }
    }

    /// Leave a match group. Pending pushes for it are dropped.
    pub fn leave_match(&mut self, match_id: MatchId) -> bool {
        let left = self.groups.remove(&match_id).is_some();
        if left {
            tracing::debug!(connection = %self.id, match_id = %match_id, "left match");
        }
        left
    }

    /// Submit a command for this connection's client.
    ///
    /// On rejection a `CommandRejected` message is queued for this connection
    /// alone. Accepted commands reach every member of the match group through
    /// the regular state push.
    pub fn send_command(
        &mut self,
        match_id: MatchId,
        request: &SubmitCommandRequest,
    ) -> Result<CommandAccepted, DispatchError> {
        let result = self.dispatcher.submit(match_id, request);
        if let Err(error) = &result {
            self.reject(error);
        }
        result
    }

    fn reject(&mut self, error: &DispatchError) {
        let problem = error.to_problem();
        tracing::warn!(
            connection = %self.id,
            code = %problem.code,
            trace_id = %problem.trace_id,
            %error,
            "rejection sent to client"
        );
        self.outbox.push_back(ServerMessage::CommandRejected(problem));
    }

    /// Take the next message to deliver, if any.
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        if let Some(message) = self.outbox.pop_front() {
            return Some(message);
        }

        let mut closed = Vec::new();
        let mut next = None;

        for (&match_id, receiver) in &mut self.groups {
            loop {
                match receiver.try_recv() {
                    Ok(view) => {
                        next = Some(ServerMessage::State(view));
                        break;
                    }
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(connection = %self.id, match_id = %match_id, skipped, "connection lagged");
                    }
                    Err(TryRecvError::Closed) => {
                        closed.push(match_id);
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }
            if next.is_some() {
                break;
            }
        }

        for match_id in closed {
            self.groups.remove(&match_id);
            tracing::debug!(connection = %self.id, match_id = %match_id, "match closed, group dropped");
        }

        next
    }

    /// Take every message currently deliverable.
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("outbox", &self.outbox.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}
