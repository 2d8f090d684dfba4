//! Config loader: reads `~/.ilog/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.ilog/config.json` (or an explicit path)
//! 3. Environment variables `ILOG_<FIELD>` (override JSON)
//!
//! Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given path (or the default one) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Apply environment overrides on top of a loaded config.
///
/// `lookup` resolves a variable name to its value; the loader passes
/// `std::env::var`, tests pass a map.
///
/// Supported overrides:
/// - `ILOG_SERVER`, `ILOG_PORT`, `ILOG_NICK`, `ILOG_CHANNEL`, `ILOG_DIR`
/// - `ILOG_ADMINS`: comma-separated nicks
/// - `ILOG_HISTORY_MAX`, `ILOG_HISTORY_DEFAULT`
/// - `ILOG_ROTATE_EVERY`, `ILOG_SEND_DELAY_MS`
fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("ILOG_SERVER") {
        config.server = val;
    }
    if let Some(val) = lookup("ILOG_PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.port = Some(p),
            Err(_) => warn!(value = %val, "ignoring unparseable ILOG_PORT"),
        }
    }
    if let Some(val) = lookup("ILOG_NICK") {
        config.nick = val;
    }
    if let Some(val) = lookup("ILOG_CHANNEL") {
        config.channel = val;
    }
    if let Some(val) = lookup("ILOG_DIR") {
        config.dir = val;
    }
    if let Some(val) = lookup("ILOG_ADMINS") {
        config.admins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(val) = lookup("ILOG_HISTORY_MAX") {
        if let Ok(n) = val.parse::<usize>() {
            config.history_max = n;
        }
    }
    if let Some(val) = lookup("ILOG_HISTORY_DEFAULT") {
        if let Ok(n) = val.parse::<usize>() {
            config.history_default = n;
        }
    }
    if let Some(val) = lookup("ILOG_ROTATE_EVERY") {
        config.rotate_every = val;
    }
    if let Some(val) = lookup("ILOG_SEND_DELAY_MS") {
        if let Ok(ms) = val.parse::<u64>() {
            config.send_delay_ms = ms;
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.history_max, 100);
        assert_eq!(config.dir, ".");
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r##"{
            "server": "irc.libera.chat",
            "port": 6667,
            "channel": "#rust",
            "admins": ["alice", "carol"],
            "historyMax": 50
        }"##,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.server, "irc.libera.chat");
        assert_eq!(config.port, Some(6667));
        assert_eq!(config.channel, "#rust");
        assert_eq!(config.admins, vec!["alice", "carol"]);
        assert_eq!(config.history_max, 50);
        // Default preserved
        assert_eq!(config.rotate_every, "1h");
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert!(config.server.is_empty());
        assert_eq!(config.history_max, 100);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.send_delay_ms, 400);
        assert!(config.port.is_none());
    }

    #[test]
    fn test_env_overrides_fields() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[
                ("ILOG_SERVER", "irc.example.org"),
                ("ILOG_PORT", "6697"),
                ("ILOG_NICK", "scribe"),
                ("ILOG_CHANNEL", "test"),
                ("ILOG_DIR", "-"),
                ("ILOG_SEND_DELAY_MS", "0"),
            ]),
        );
        assert_eq!(config.server, "irc.example.org");
        assert_eq!(config.port, Some(6697));
        assert_eq!(config.nick, "scribe");
        assert_eq!(config.channel, "test");
        assert_eq!(config.dir, "-");
        assert_eq!(config.send_delay_ms, 0);
    }

    #[test]
    fn test_env_admins_comma_separated() {
        let config =
            apply_env_overrides(Config::default(), env(&[("ILOG_ADMINS", "alice, bob,,")]));
        assert_eq!(config.admins, vec!["alice", "bob"]);
    }

    #[test]
    fn test_env_bad_port_ignored() {
        let mut base = Config::default();
        base.port = Some(6667);
        let config = apply_env_overrides(base, env(&[("ILOG_PORT", "not-a-port")]));
        assert_eq!(config.port, Some(6667));
    }

    #[test]
    fn test_env_overrides_json() {
        let file = write_temp_json(r#"{ "historyMax": 20 }"#);
        let config = apply_env_overrides(
            load_config_from_path(file.path()),
            env(&[("ILOG_HISTORY_MAX", "30")]),
        );
        assert_eq!(config.history_max, 30);
    }
}
