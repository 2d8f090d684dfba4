//! The session's critical section: log sink, history buffer, memo store.
//!
//! Everything here is mutated only through `Arc<tokio::sync::Mutex<SessionState>>`,
//! shared by the read loop and the rotation timer.

use chrono::{DateTime, Utc};

use ilog_core::{HistoryBuffer, LogSink, MemoStore, SessionConfig, SinkError};

pub struct SessionState {
    pub sink: LogSink,
    pub history: HistoryBuffer,
    pub memos: MemoStore,
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sink: LogSink::new(config.destination.clone(), &config.server, &config.channel),
            history: HistoryBuffer::new(config.history_max),
            memos: MemoStore::new(),
        }
    }

    /// Log one display line and remember it for history replay.
    ///
    /// The line only enters the history buffer once it has been written.
    pub fn record(&mut self, at: DateTime<Utc>, display: &str) -> Result<(), SinkError> {
        self.sink.append(at, display)?;
        self.history.push(display);
        Ok(())
    }
}
