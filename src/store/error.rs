//! Error taxonomy surfaced by the dispatcher.
//!
//! Every rejection maps to a stable machine-readable code and an HTTP-style
//! status, and renders as a [`Problem`] payload carrying a trace ID that is
//! also written to the log.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::{MatchId, PlayerId};
use crate::rules::InvariantViolation;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("command type is required")]
    InvalidType,

    #[error("player id is required")]
    InvalidPlayer,

    #[error("client sequence number cannot be negative (was {0})")]
    InvalidClientSequence(i64),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("unknown command type {0:?} or missing required fields")]
    UnknownCommandType(String),

    #[error("command {client_seq} from {player} was already processed")]
    DuplicateCommand { player: PlayerId, client_seq: u64 },

    #[error("match {0} already exists")]
    MatchExists(MatchId),

    #[error("at least two distinct, non-blank villains are required")]
    InvalidVillains,

    #[error("match limit of {0} reached")]
    CapacityExceeded(usize),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl DispatchError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidType => "command.invalid_type",
            Self::InvalidPlayer => "command.invalid_player",
            Self::InvalidClientSequence(_) => "command.invalid_client_sequence",
            Self::MatchNotFound(_) => "match.not_found",
            Self::UnknownCommandType(_) => "command.unknown_type",
            Self::DuplicateCommand { .. } => "command.duplicate",
            Self::InvalidVillains => "match.invalid_villains",
            Self::MatchExists(_) => "match.exists",
            Self::CapacityExceeded(_) => "match.capacity_exceeded",
            Self::Invariant(_) => "engine.invariant_violation",
        }
    }

    /// HTTP-equivalent status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidType
            | Self::InvalidPlayer
            | Self::InvalidClientSequence(_)
            | Self::UnknownCommandType(_)
            | Self::InvalidVillains => 400,
            Self::MatchNotFound(_) => 404,
            Self::DuplicateCommand { .. } | Self::MatchExists(_) => 409,
            Self::Invariant(_) => 500,
            Self::CapacityExceeded(_) => 503,
        }
    }

    /// Short human-readable title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidType => "Invalid command type",
            Self::InvalidPlayer => "Invalid player",
            Self::InvalidClientSequence(_) => "Invalid client sequence",
            Self::MatchNotFound(_) => "Match not found",
            Self::UnknownCommandType(_) => "Unknown command type",
            Self::DuplicateCommand { .. } => "Duplicate command",
            Self::InvalidVillains => "Invalid villains",
            Self::MatchExists(_) => "Match already exists",
            Self::CapacityExceeded(_) => "Match capacity exceeded",
            Self::Invariant(_) => "Invariant violation",
        }
    }

    /// Caller errors must not be retried unchanged. Only capacity pressure is
    /// transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::CapacityExceeded(_))
    }

    /// Render as a problem payload with a fresh trace ID.
    #[must_use]
    pub fn to_problem(&self) -> Problem {
        Problem::from_error(self, new_trace_id())
    }
}

/// Problem payload returned to callers and pushed to rejected connections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub status: u16,
    pub title: String,
    pub code: String,
    pub trace_id: String,
}

impl Problem {
    /// Create a problem payload.
    pub fn new(status: u16, code: impl Into<String>, title: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            code: code.into(),
            trace_id: trace_id.into(),
        }
    }

    /// Render an error with the given trace ID.
    pub fn from_error(error: &DispatchError, trace_id: impl Into<String>) -> Self {
        Self::new(error.status(), error.code(), error.title(), trace_id)
    }
}

/// Fresh correlation identifier for a rejection.
#[must_use]
pub fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}
