//! Pending memos, keyed by recipient nick.
//!
//! Nicks are compared ASCII-case-insensitively, matching how IRC servers
//! treat them. A recipient key exists only while it has at least one memo;
//! [`MemoStore::drain`] removes the key and returns its memos in one step.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::utils;

/// A message left for an absent user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memo {
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

impl Memo {
    pub fn new(author: impl Into<String>, created_at: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            created_at,
            text: text.into(),
        }
    }

    /// Channel announcement for `recipient`, e.g.
    /// `bob: (memo from alice at 2024-03-07 09:05:01 utc) pick up milk`.
    pub fn announcement(&self, recipient: &str) -> String {
        format!(
            "{recipient}: (memo from {} at {}) {}",
            self.author,
            utils::format_utc_timestamp(self.created_at),
            self.text
        )
    }
}

/// Memos awaiting each recipient's next join.
#[derive(Debug, Default)]
pub struct MemoStore {
    pending: HashMap<String, Vec<Memo>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a memo behind any already waiting for `recipient`.
    pub fn add(&mut self, recipient: &str, memo: Memo) {
        self.pending.entry(key(recipient)).or_default().push(memo);
    }

    /// Remove and return every memo for `recipient`, oldest first.
    pub fn drain(&mut self, recipient: &str) -> Vec<Memo> {
        self.pending.remove(&key(recipient)).unwrap_or_default()
    }

    /// Number of memos waiting for `recipient`.
    pub fn pending_for(&self, recipient: &str) -> usize {
        self.pending.get(&key(recipient)).map_or(0, Vec::len)
    }

    pub fn contains(&self, recipient: &str) -> bool {
        self.pending.contains_key(&key(recipient))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn key(nick: &str) -> String {
    nick.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 9, minute, 0).unwrap()
    }

    #[test]
    fn test_announcement_format() {
        let memo = Memo::new("alice", at(5), "pick up milk");
        assert_eq!(
            memo.announcement("bob"),
            "bob: (memo from alice at 2024-03-07 09:05:00 utc) pick up milk"
        );
    }

    #[test]
    fn test_drain_is_fifo() {
        let mut store = MemoStore::new();
        store.add("bob", Memo::new("alice", at(1), "M1"));
        store.add("bob", Memo::new("carol", at(2), "M2"));
        store.add("bob", Memo::new("alice", at(3), "M3"));

        let texts: Vec<String> = store.drain("bob").into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn test_drain_removes_key() {
        let mut store = MemoStore::new();
        store.add("bob", Memo::new("alice", at(1), "hi"));
        assert!(store.contains("bob"));

        assert_eq!(store.drain("bob").len(), 1);
        assert!(!store.contains("bob"));
        assert!(store.drain("bob").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_recipients_are_independent() {
        let mut store = MemoStore::new();
        store.add("bob", Memo::new("alice", at(1), "for bob"));
        store.add("dave", Memo::new("alice", at(2), "for dave"));
        assert_eq!(store.pending_for("bob"), 1);
        assert_eq!(store.pending_for("dave"), 1);

        store.drain("bob");
        assert_eq!(store.pending_for("dave"), 1);
        assert_eq!(store.pending_for("bob"), 0);
    }

    #[test]
    fn test_nick_case_insensitive() {
        let mut store = MemoStore::new();
        store.add("Bob", Memo::new("alice", at(1), "hi"));
        assert_eq!(store.pending_for("bob"), 1);
        assert_eq!(store.drain("BOB").len(), 1);
        assert!(store.is_empty());
    }
}
