//! Bounded FIFO of recently logged display lines.

use std::collections::VecDeque;

/// Recent display lines, oldest first.
///
/// Holds at most `capacity` entries; every push beyond that evicts from the
/// front.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<String>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a line, evicting the oldest entries past capacity.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_back(line.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The last `count` entries in original order.
    ///
    /// `count` is clamped to the buffer length.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let count = count.min(self.entries.len());
        self.entries
            .iter()
            .skip(self.entries.len() - count)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
