//! Admin command grammar.
//!
//! Commands are plain channel chat; the engine only consults this parser
//! for senders in the admin set.
//!
//! - `history` / `history <n>`: replay the last lines to the requester
//! - `memo <recipient>: <text>`: leave a memo for an absent user

use std::sync::LazyLock;

use regex::Regex;

static HISTORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^history(?:\s+(\d+))?$").expect("valid history pattern"));

static MEMO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^memo\s+([^\s:]+)\s*:\s*(\S.*)$").expect("valid memo pattern")
});

/// A recognized admin command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminCommand {
    /// Replay recent history; `None` means the configured default count.
    History { count: Option<usize> },
    /// Store a memo for `recipient`.
    Memo { recipient: String, text: String },
}

/// Parse chat text as an admin command, if it is one.
pub fn parse_admin_command(text: &str) -> Option<AdminCommand> {
    let text = text.trim();

    if let Some(caps) = HISTORY_RE.captures(text) {
        // Overflowing counts are clamped to the buffer length later anyway.
        let count = caps
            .get(1)
            .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX));
        return Some(AdminCommand::History { count });
    }

    if let Some(caps) = MEMO_RE.captures(text) {
        return Some(AdminCommand::Memo {
            recipient: caps[1].to_string(),
            text: caps[2].trim_end().to_string(),
        });
    }

    None
}
