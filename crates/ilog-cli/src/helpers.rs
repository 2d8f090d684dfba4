//! Shared CLI helpers: startup banner, config errors.
//!
//! Everything here prints to stderr; stdout may be the channel log.

use colored::Colorize;

use ilog_core::config::get_config_path;
use ilog_core::{ConfigError, LogDestination, SessionConfig};

/// Print the banner shown at startup.
pub fn print_banner(config: &SessionConfig) {
    let version = env!("CARGO_PKG_VERSION");
    let destination = match &config.destination {
        LogDestination::Stdout => "stdout".to_string(),
        LogDestination::Directory(dir) => dir.display().to_string(),
    };

    eprintln!("{}  v{}", "ilog".cyan().bold(), version.dimmed());
    eprintln!(
        "  {} {}:{} {}",
        "logging".dimmed(),
        config.server,
        config.port,
        config.wire_channel().bold()
    );
    eprintln!("  {} {}", "into".dimmed(), destination);
}

/// Print a configuration error with a usage reminder.
pub fn print_config_error(err: &ConfigError) {
    eprintln!("{} {}", "error:".red().bold(), err);
    eprintln!();
    eprintln!("{}", "usage:".bold());
    eprintln!("  ilog -s <server> -p <port> -n <nick> -c <channel> [-d <dir>] [-a <admin>]...");
    eprintln!();
    eprintln!("{}", "example:".bold());
    eprintln!("  ilog -s irc.libera.chat -p 6667 -n ilogbot -c rust -d ~/irc-logs");
    eprintln!();
    eprintln!(
        "{}",
        format!(
            "Settings may also come from {} or ILOG_* environment variables.",
            get_config_path().display()
        )
        .dimmed()
    );
}
