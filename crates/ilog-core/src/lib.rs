//! ilog core: configuration, protocol classification, and the stateful
//! pieces guarded by the session's critical section.
//!
//! - **config**: layered configuration (defaults → JSON → env) and the
//!   resolved, immutable [`SessionConfig`]
//! - **protocol**: line classifier, admin command grammar, outbound lines
//! - **history**: bounded FIFO of recently logged display lines
//! - **memo**: pending memos keyed by recipient nick
//! - **sink**: the log target (stdout or a dated file) and its rotation

pub mod config;
pub mod error;
pub mod history;
pub mod memo;
pub mod protocol;
pub mod sink;
pub mod utils;

pub use config::{Config, LogDestination, SessionConfig};
pub use error::{ConfigError, SinkError};
pub use history::HistoryBuffer;
pub use memo::{Memo, MemoStore};
pub use protocol::{classify, LineEvent};
pub use sink::LogSink;
