//! Log sink: the single open output target for channel logs.
//!
//! File layout: `{dir}/{server}_{channel}_{YYYY-MM-DD}.txt`, opened in
//! append mode, one line per event prefixed `YYYY-MM-DD HH:MM:SS utc `.
//! With the stdout destination every line goes to standard output and
//! rotation is a no-op.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::config::LogDestination;
use crate::error::SinkError;
use crate::utils;

/// File name for one (server, channel, date) log.
pub fn log_file_name(server: &str, channel: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.txt",
        utils::safe_filename(server),
        utils::safe_filename(channel),
        utils::format_date(date)
    )
}

/// One log line, without the trailing newline.
pub fn format_log_line(at: DateTime<Utc>, display: &str) -> String {
    format!("{} {}", utils::format_utc_timestamp(at), display)
}

enum Target {
    Closed,
    Stdout,
    File { path: PathBuf, file: File },
}

/// Owns the current log target.
///
/// Not synchronized on its own; the session keeps it inside the same lock
/// as the history buffer and memo store.
pub struct LogSink {
    destination: LogDestination,
    server: String,
    channel: String,
    target: Target,
}

impl LogSink {
    /// Create a sink with no open target. Call [`LogSink::rotate`] to open one.
    pub fn new(destination: LogDestination, server: &str, channel: &str) -> Self {
        Self {
            destination,
            server: server.to_string(),
            channel: channel.trim_start_matches('#').to_string(),
            target: Target::Closed,
        }
    }

    /// The file a log for `date` lives in, or `None` for stdout.
    pub fn path_for(&self, date: NaiveDate) -> Option<PathBuf> {
        match &self.destination {
            LogDestination::Stdout => None,
            LogDestination::Directory(dir) => {
                Some(dir.join(log_file_name(&self.server, &self.channel, date)))
            }
        }
    }

    /// Re-derive the target for `now` and switch to it.
    ///
    /// The new file is opened before the old one is dropped, so a failed
    /// open leaves the previous target in place and returns the error.
    /// Re-deriving the same path reopens the same file in append mode.
    pub fn rotate(&mut self, now: DateTime<Utc>) -> Result<(), SinkError> {
        let Some(path) = self.path_for(now.date_naive()) else {
            if !matches!(self.target, Target::Stdout) {
                debug!("log sink writing to stdout");
                self.target = Target::Stdout;
            }
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        let changed = self.current_path() != Some(path.as_path());
        if changed {
            info!(path = %path.display(), "log target opened");
        } else {
            debug!(path = %path.display(), "log target reopened");
        }

        // Dropping the previous `File` closes it.
        self.target = Target::File { path, file };
        Ok(())
    }

    /// Write one timestamped line and flush it.
    pub fn append(&mut self, at: DateTime<Utc>, display: &str) -> Result<(), SinkError> {
        let mut line = format_log_line(at, display);
        line.push('\n');

        match &mut self.target {
            Target::Closed => return Err(SinkError::NotOpen),
            Target::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.flush()?;
            }
            Target::File { file, .. } => {
                file.write_all(line.as_bytes())?;
                file.flush()?;
            }
        }
        Ok(())
    }

    /// Path of the open log file, if the target is a file.
    pub fn current_path(&self) -> Option<&Path> {
        match &self.target {
            Target::File { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.target, Target::Closed)
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self.target, Target::Stdout)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
