//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use ilog_core::config;
//!
//! let cfg = config::load_config(None);
//! let session = cfg.resolve().expect("server, port, nick and channel are set");
//! println!("Logging {} on {}", session.wire_channel(), session.server);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config};
pub use schema::{Config, LogDestination, SessionConfig};
