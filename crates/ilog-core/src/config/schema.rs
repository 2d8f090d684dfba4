//! Configuration schema.
//!
//! `Config` is the loose, layered form (every field optional or defaulted)
//! read from JSON, env vars, and CLI flags. `Config::resolve` turns it into
//! the immutable [`SessionConfig`] the engine runs on, rejecting missing
//! required settings up front.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::utils;

/// Directory value that redirects all log output to standard output.
pub const STDOUT_SENTINEL: &str = "-";

/// Default number of lines kept for history replay.
pub const DEFAULT_HISTORY_MAX: usize = 100;

/// Default number of lines replayed by a bare `history` request.
pub const DEFAULT_HISTORY_COUNT: usize = 10;

/// Default rotation schedule.
pub const DEFAULT_ROTATE_EVERY: &str = "1h";

/// Default pause between bulk sends (history replay, memo delivery).
pub const DEFAULT_SEND_DELAY_MS: u64 = 400;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Layered configuration: loaded from `~/.ilog/config.json` + env vars,
/// then overridden by command-line flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// IRC server hostname.
    pub server: String,
    /// IRC server port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Nickname the logger registers with.
    pub nick: String,
    /// Channel to join, with or without the leading `#`.
    pub channel: String,
    /// Log directory, or `-` for standard output.
    pub dir: String,
    /// Nicks allowed to request history and author memos.
    pub admins: Vec<String>,
    /// History buffer capacity.
    pub history_max: usize,
    /// Lines replayed when `history` is sent without a count.
    pub history_default: usize,
    /// Rotation schedule: `"30m"`, `"1h"`, `"1d"`, or a cron expression.
    pub rotate_every: String,
    /// Pause between consecutive bulk sends, in milliseconds.
    pub send_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: None,
            nick: String::new(),
            channel: String::new(),
            dir: ".".to_string(),
            admins: Vec::new(),
            history_max: DEFAULT_HISTORY_MAX,
            history_default: DEFAULT_HISTORY_COUNT,
            rotate_every: DEFAULT_ROTATE_EVERY.to_string(),
            send_delay_ms: DEFAULT_SEND_DELAY_MS,
        }
    }
}

impl Config {
    /// Validate required settings and produce the immutable session config.
    pub fn resolve(&self) -> Result<SessionConfig, ConfigError> {
        let server = required("server", &self.server)?;
        let port = match self.port {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    field: "port",
                    reason: "must be between 1 and 65535".into(),
                })
            }
            Some(p) => p,
            None => return Err(ConfigError::Missing("port")),
        };
        let nick = required("nick", &self.nick)?;
        let channel = required("channel", self.channel.trim_start_matches('#'))?;

        if nick.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "nick",
                reason: "must not contain whitespace".into(),
            });
        }
        if channel.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "channel",
                reason: "must not contain whitespace".into(),
            });
        }
        if self.rotate_every.trim().is_empty() {
            return Err(ConfigError::Missing("rotateEvery"));
        }

        let dir = self.dir.trim();
        let destination = if dir == STDOUT_SENTINEL {
            LogDestination::Stdout
        } else if dir.is_empty() {
            LogDestination::Directory(PathBuf::from("."))
        } else {
            LogDestination::Directory(utils::expand_home(dir))
        };

        Ok(SessionConfig {
            server,
            port,
            nick,
            channel,
            destination,
            admins: self
                .admins
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            history_max: self.history_max,
            history_default: self.history_default,
            rotate_every: self.rotate_every.trim().to_string(),
            send_delay: Duration::from_millis(self.send_delay_ms),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

// ─────────────────────────────────────────────
// Resolved session config
// ─────────────────────────────────────────────

/// Where log lines go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogDestination {
    /// The process's standard output; never rotated or closed.
    Stdout,
    /// A directory holding one file per (server, channel, UTC date).
    Directory(PathBuf),
}

/// Immutable configuration for one session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub server: String,
    pub port: u16,
    pub nick: String,
    /// Channel name without the leading `#`.
    pub channel: String,
    pub destination: LogDestination,
    pub admins: HashSet<String>,
    pub history_max: usize,
    pub history_default: usize,
    pub rotate_every: String,
    pub send_delay: Duration,
}

impl SessionConfig {
    /// Channel name as sent on the wire (`#test`).
    pub fn wire_channel(&self) -> String {
        format!("#{}", self.channel)
    }

    /// Whether `nick` may use the admin commands.
    pub fn is_admin(&self, nick: &str) -> bool {
        self.admins.contains(nick)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Config {
        Config {
            server: "irc.example.org".into(),
            port: Some(6667),
            nick: "ilogbot".into(),
            channel: "test".into(),
            admins: vec!["alice".into()],
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.dir, ".");
        assert_eq!(cfg.history_max, 100);
        assert_eq!(cfg.history_default, 10);
        assert_eq!(cfg.rotate_every, "1h");
        assert_eq!(cfg.send_delay_ms, 400);
    }

    #[test]
    fn test_resolve_complete() {
        let session = complete().resolve().unwrap();
        assert_eq!(session.server, "irc.example.org");
        assert_eq!(session.port, 6667);
        assert_eq!(session.channel, "test");
        assert_eq!(session.wire_channel(), "#test");
        assert_eq!(
            session.destination,
            LogDestination::Directory(PathBuf::from("."))
        );
        assert!(session.is_admin("alice"));
        assert!(!session.is_admin("mallory"));
        assert_eq!(session.send_delay, Duration::from_millis(400));
    }

    #[test]
    fn test_resolve_strips_channel_hash() {
        let mut cfg = complete();
        cfg.channel = "#rust".into();
        let session = cfg.resolve().unwrap();
        assert_eq!(session.channel, "rust");
        assert_eq!(session.wire_channel(), "#rust");
    }

    #[test]
    fn test_resolve_stdout_sentinel() {
        let mut cfg = complete();
        cfg.dir = "-".into();
        assert_eq!(cfg.resolve().unwrap().destination, LogDestination::Stdout);
    }

    #[test]
    fn test_resolve_missing_fields() {
        let mut cfg = complete();
        cfg.server.clear();
        assert!(matches!(cfg.resolve(), Err(ConfigError::Missing("server"))));

        let mut cfg = complete();
        cfg.port = None;
        assert!(matches!(cfg.resolve(), Err(ConfigError::Missing("port"))));

        let mut cfg = complete();
        cfg.nick = "  ".into();
        assert!(matches!(cfg.resolve(), Err(ConfigError::Missing("nick"))));

        let mut cfg = complete();
        cfg.channel = "#".into();
        assert!(matches!(cfg.resolve(), Err(ConfigError::Missing("channel"))));
    }

    #[test]
    fn test_resolve_rejects_port_zero() {
        let mut cfg = complete();
        cfg.port = Some(0);
        assert!(matches!(
            cfg.resolve(),
            Err(ConfigError::Invalid { field: "port", .. })
        ));
    }

    #[test]
    fn test_resolve_drops_blank_admins() {
        let mut cfg = complete();
        cfg.admins = vec![" bob ".into(), "".into()];
        let session = cfg.resolve().unwrap();
        assert_eq!(session.admins.len(), 1);
        assert!(session.is_admin("bob"));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(complete()).unwrap();
        assert!(json.get("historyMax").is_some());
        assert!(json.get("sendDelayMs").is_some());
        assert!(json.get("history_max").is_none());
    }
}
