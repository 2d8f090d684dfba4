//! Session errors.

use ilog_core::SinkError;
use ilog_cron::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {server}:{port}: {source}")]
    Connect {
        server: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send to server: {0}")]
    Send(#[source] std::io::Error),

    #[error("failed to read from server: {0}")]
    Receive(#[source] std::io::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("invalid rotation schedule: {0}")]
    Schedule(#[from] ScheduleError),
}
