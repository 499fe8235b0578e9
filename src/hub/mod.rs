//! Per-connection fan-out of match state.
//!
//! A [`Connection`] joins match groups, submits commands on behalf of its
//! client and collects [`ServerMessage`]s to deliver: state pushes for every
//! joined match, and rejections for its own commands only.

pub mod connection;

pub use connection::{Connection, ConnectionId, ServerMessage};
