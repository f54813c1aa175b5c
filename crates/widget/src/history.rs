//! Bounded conversation history

use assistant_common::{HistoryEntry, MAX_HISTORY_ENTRIES};
use std::collections::VecDeque;

/// FIFO log of answered questions.
///
/// Entries accumulate freely; [`HistoryBuffer::archive`] drops the oldest
/// ones down to capacity and runs before every request.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
    }

    /// Evict oldest entries until at most `capacity` remain
    pub fn archive(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entries oldest first
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> HistoryBuffer {
        let mut buffer = HistoryBuffer::default();
        for i in 1..=n {
            buffer.push(HistoryEntry::new(format!("q{}", i), format!("a{}", i)));
        }
        buffer
    }

    #[test]
    fn test_archive_keeps_last_nine_oldest_first() {
        let mut buffer = filled(12);
        assert_eq!(buffer.len(), 12);

        buffer.archive();

        let entries = buffer.to_vec();
        assert_eq!(entries.len(), 9);
        assert_eq!(entries.first().unwrap().question(), "q4");
        assert_eq!(entries.last().unwrap().question(), "q12");
    }

    #[test]
    fn test_archive_under_capacity_is_noop() {
        let mut buffer = filled(3);
        buffer.archive();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.to_vec()[0].answer(), "a1");
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(HistoryBuffer::default().capacity(), 9);
        assert!(HistoryBuffer::default().is_empty());
    }
}
