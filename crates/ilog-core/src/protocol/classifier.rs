//! Line classifier.
//!
//! Matches are line-anchored and case-sensitive, except the `PING` verb.
//! Anything that is not a ping, a channel message, or a join degrades to
//! [`LineEvent::Other`]; classification never fails.

use std::sync::LazyLock;

use regex::Regex;

static PING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PING\s+:?(.*)$").expect("valid PING pattern"));

static PRIVMSG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:([^!\s]+)(?:!\S*)? PRIVMSG (#\S+) :(.*)$").expect("valid PRIVMSG pattern")
});

static JOIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:([^!\s]+)(?:!\S*)? JOIN :?#\S*").expect("valid JOIN pattern")
});

/// One classified inbound line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineEvent {
    /// Keepalive probe; `token` is echoed back in the `PONG`.
    Ping { token: String },
    /// Someone spoke in a channel.
    ChatMessage {
        sender: String,
        target: String,
        text: String,
    },
    /// Someone entered the channel.
    Join { nick: String },
    /// Anything else, verbatim.
    Other(String),
}

impl LineEvent {
    /// The form this line takes in the log and the history buffer.
    ///
    /// Chat messages become `sender: text`; everything else is the raw line.
    pub fn display(&self, raw: &str) -> String {
        match self {
            LineEvent::ChatMessage { sender, text, .. } => format!("{sender}: {text}"),
            LineEvent::Other(line) => line.clone(),
            _ => raw.to_string(),
        }
    }
}

/// Classify one raw protocol line (without its trailing newline).
pub fn classify(line: &str) -> LineEvent {
    if let Some(caps) = PING_RE.captures(line) {
        return LineEvent::Ping {
            token: caps[1].to_string(),
        };
    }

    if let Some(caps) = PRIVMSG_RE.captures(line) {
        return LineEvent::ChatMessage {
            sender: caps[1].to_string(),
            target: caps[2].to_string(),
            text: caps[3].to_string(),
        };
    }

    if let Some(caps) = JOIN_RE.captures(line) {
        return LineEvent::Join {
            nick: caps[1].to_string(),
        };
    }

    LineEvent::Other(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        assert_eq!(
            classify("PING :irc.example.org"),
            LineEvent::Ping {
                token: "irc.example.org".into()
            }
        );
    }

    #[test]
    fn test_ping_case_insensitive() {
        assert_eq!(
            classify("ping :abc123"),
            LineEvent::Ping {
                token: "abc123".into()
            }
        );
    }

    #[test]
    fn test_ping_without_colon() {
        assert_eq!(
            classify("PING 12345"),
            LineEvent::Ping {
                token: "12345".into()
            }
        );
    }

    #[test]
    fn test_channel_message() {
        let event = classify(":alice!~alice@host.example PRIVMSG #test :hello there");
        assert_eq!(
            event,
            LineEvent::ChatMessage {
                sender: "alice".into(),
                target: "#test".into(),
                text: "hello there".into(),
            }
        );
    }

    #[test]
    fn test_channel_message_keeps_colons_in_text() {
        match classify(":bob!b@h PRIVMSG #test :memo carol: see: this") {
            LineEvent::ChatMessage { text, .. } => assert_eq!(text, "memo carol: see: this"),
            other => panic!("expected chat message, got {other:?}"),
        }
    }

    #[test]
    fn test_private_message_is_other() {
        let line = ":alice!a@h PRIVMSG ilogbot :psst";
        assert_eq!(classify(line), LineEvent::Other(line.into()));
    }

    #[test]
    fn test_privmsg_verb_is_case_sensitive() {
        let line = ":alice!a@h privmsg #test :hi";
        assert_eq!(classify(line), LineEvent::Other(line.into()));
    }

    #[test]
    fn test_join() {
        assert_eq!(
            classify(":bob!~bob@host JOIN #test"),
            LineEvent::Join { nick: "bob".into() }
        );
        assert_eq!(
            classify(":bob!~bob@host JOIN :#test"),
            LineEvent::Join { nick: "bob".into() }
        );
    }

    #[test]
    fn test_other_lines() {
        for line in [
            ":irc.example.org 001 ilogbot :Welcome",
            ":bob!b@h PART #test :bye",
            "NOTICE AUTH :*** Looking up your hostname",
            "",
            "PING",
            "   ",
        ] {
            assert_eq!(classify(line), LineEvent::Other(line.into()), "line: {line:?}");
        }
    }

    #[test]
    fn test_total_on_odd_input() {
        let long = "x".repeat(10_000);
        let inputs = [
            ":",
            "::::",
            ":! PRIVMSG # :",
            "\u{0}\u{1}garbage",
            "PRIVMSG #test :no prefix",
            "ünïcödé :PRIVMSG",
            long.as_str(),
        ];
        for input in inputs {
            // Must return without panicking; every input gets exactly one variant.
            let _ = classify(input);
        }
    }

    #[test]
    fn test_display_forms() {
        let raw = ":alice!a@h PRIVMSG #test :hi";
        assert_eq!(classify(raw).display(raw), "alice: hi");

        let raw = ":bob!b@h JOIN #test";
        assert_eq!(classify(raw).display(raw), raw);

        let raw = ":server 372 ilogbot :- motd";
        assert_eq!(classify(raw).display(raw), raw);
    }
}
