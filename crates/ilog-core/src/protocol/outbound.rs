//! Outbound protocol lines.
//!
//! Builders return a single line without the CRLF terminator; the
//! connection writer appends it. CR and LF are stripped from interpolated
//! values so one call always yields exactly one protocol line.

/// The three registration lines sent once after connecting.
pub fn handshake(nick: &str, wire_channel: &str) -> [String; 3] {
    let nick = strip_line_breaks(nick);
    [
        format!("USER {nick} {nick}0 {nick}1 :{nick}"),
        format!("NICK {nick}"),
        format!("JOIN {}", strip_line_breaks(wire_channel)),
    ]
}

/// Keepalive reply echoing the probe's token.
pub fn pong(token: &str) -> String {
    format!("PONG :{}", strip_line_breaks(token))
}

/// A chat message to a channel or a nick.
pub fn privmsg(target: &str, text: &str) -> String {
    format!(
        "PRIVMSG {} :{}",
        strip_line_breaks(target),
        strip_line_breaks(text)
    )
}

fn strip_line_breaks(s: &str) -> String {
    s.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake() {
        let lines = handshake("ilogbot", "#test");
        assert_eq!(lines[0], "USER ilogbot ilogbot0 ilogbot1 :ilogbot");
        assert_eq!(lines[1], "NICK ilogbot");
        assert_eq!(lines[2], "JOIN #test");
    }

    #[test]
    fn test_pong() {
        assert_eq!(pong("irc.example.org"), "PONG :irc.example.org");
    }

    #[test]
    fn test_privmsg() {
        assert_eq!(privmsg("#test", "hi all"), "PRIVMSG #test :hi all");
        assert_eq!(privmsg("alice", "alice: hi"), "PRIVMSG alice :alice: hi");
    }

    #[test]
    fn test_privmsg_strips_injection() {
        assert_eq!(
            privmsg("#test", "hi\r\nQUIT :bye"),
            "PRIVMSG #test :hiQUIT :bye"
        );
    }
}
