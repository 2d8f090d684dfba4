//! Error types for configuration resolution and the log sink.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected before the engine starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Failures of the log sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log entry: {0}")]
    Write(#[from] std::io::Error),

    #[error("log sink has no open target")]
    NotOpen,
}
