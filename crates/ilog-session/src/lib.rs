//! ilog session: the engine that owns the IRC connection.
//!
//! This crate provides:
//! - **engine**: [`SessionEngine`]: handshake, read loop, per-line handling,
//!   history replay, memo delivery, and the rotation timer
//! - **state**: [`SessionState`]: sink, history, and memos behind one lock
//! - **connection**: line reader/writer halves over any async byte stream

pub mod connection;
pub mod engine;
pub mod error;
pub mod state;

pub use engine::SessionEngine;
pub use error::SessionError;
pub use state::SessionState;
