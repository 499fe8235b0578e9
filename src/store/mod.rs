//! Match hosting: the shared match table, command intake and the error
//! taxonomy callers see.
//!
//! - `table`: per-match state, replay log, idempotency ledger and pushes
//! - `dispatcher`: validates and sequences submissions
//! - `request`: wire shapes
//! - `error`: codes, statuses and problem payloads

pub mod error;
pub mod request;
pub mod table;
pub mod dispatcher;

pub use error::{new_trace_id, DispatchError, Problem, Result};
pub use request::{
    CommandAccepted, CreateMatchRequest, CreateMatchResponse, GameStateView, PlayerStateView, SubmitCommandRequest,
};
pub use table::{Commit, MatchStore, Subscription};
pub use dispatcher::Dispatcher;
