//! ilog CLI: entry point.
//!
//! ```text
//! ilog -s <server> -p <port> -n <nick> -c <channel> [-d <dir>] [-a <admin>]...
//! ```
//!
//! Settings are layered: defaults, then `~/.ilog/config.json` (or
//! `--config`), then `ILOG_*` environment variables, then these flags.

mod helpers;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ilog_core::config::load_config;
use ilog_core::utils;
use ilog_core::{Config, SessionConfig};
use ilog_session::SessionEngine;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ilog: persistent IRC channel logger
#[derive(Parser, Debug)]
#[command(name = "ilog", version, about, long_about = None)]
struct Cli {
    /// IRC server hostname
    #[arg(short, long)]
    server: Option<String>,

    /// IRC server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Nickname to register with
    #[arg(short, long)]
    nick: Option<String>,

    /// Channel to join (leading `#` optional)
    #[arg(short, long)]
    channel: Option<String>,

    /// Log directory, or `-` for standard output
    #[arg(short, long)]
    dir: Option<String>,

    /// Nick allowed to request history and leave memos (repeatable)
    #[arg(short, long = "admin")]
    admins: Vec<String>,

    /// Number of lines kept for history replay
    #[arg(long)]
    history_max: Option<usize>,

    /// Lines replayed by a bare `history` request
    #[arg(long)]
    history_default: Option<usize>,

    /// Rotation schedule: `30m`, `1h`, `1d`, or a cron expression
    #[arg(long)]
    rotate_every: Option<String>,

    /// Pause between bulk sends, in milliseconds
    #[arg(long)]
    send_delay_ms: Option<u64>,

    /// Config file (default: ~/.ilog/config.json)
    #[arg(long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

impl Cli {
    /// Layer the flags that were given on top of `config`.
    fn apply_to(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server = server.clone();
        }
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if let Some(nick) = &self.nick {
            config.nick = nick.clone();
        }
        if let Some(channel) = &self.channel {
            config.channel = channel.clone();
        }
        if let Some(dir) = &self.dir {
            config.dir = dir.clone();
        }
        if !self.admins.is_empty() {
            config.admins = self.admins.clone();
        }
        if let Some(n) = self.history_max {
            config.history_max = n;
        }
        if let Some(n) = self.history_default {
            config.history_default = n;
        }
        if let Some(spec) = &self.rotate_every {
            config.rotate_every = spec.clone();
        }
        if let Some(ms) = self.send_delay_ms {
            config.send_delay_ms = ms;
        }
    }
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config_path = cli.config.as_deref().map(utils::expand_home);
    let mut config = load_config(config_path.as_deref());
    cli.apply_to(&mut config);

    let session_config = match config.resolve() {
        Ok(c) => c,
        Err(e) => {
            helpers::print_config_error(&e);
            std::process::exit(1);
        }
    };

    helpers::print_banner(&session_config);
    run(session_config).await
}

/// Run one logging session until the server closes the connection or
/// Ctrl+C is pressed.
async fn run(config: SessionConfig) -> Result<()> {
    let engine = SessionEngine::new(config).context("invalid session configuration")?;

    tokio::select! {
        result = engine.run() => {
            result.context("logging session failed")?;
            info!("session ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("ilog=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    // Diagnostics go to stderr; stdout may carry the channel log (`-d -`).
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
