//! Bounded search and replace history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept per history list.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Which replace action produced a [`ReplaceRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceScope {
    /// A single match was replaced.
    Current,
    /// Every match was replaced in one batch.
    All,
}

/// One entry of the replace history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRecord {
    /// The query whose matches were replaced.
    pub query: String,
    /// The replacement text as typed (before capture expansion).
    pub replacement: String,
    /// Number of matches replaced.
    pub count: usize,
    /// Whether this was a single or a batch replacement.
    pub scope: ReplaceScope,
}

/// A bounded, most-recent-first history list.
///
/// Pushing an entry equal to one already present moves it to the front
/// instead of storing it twice. The oldest entry is evicted once the list
/// exceeds its limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<T> {
    /// History entries (most recent first)
    entries: VecDeque<T>,

    /// Maximum entries to keep
    max_entries: usize,
}

impl<T: PartialEq> History<T> {
    /// Create a new history keeping at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(64)),
            max_entries,
        }
    }

    /// Add an entry to the front of the history.
    pub fn push(&mut self, entry: T) {
        if let Some(existing) = self.entries.iter().position(|e| *e == entry) {
            self.entries.remove(existing);
        }
        self.entries.push_front(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_back();
        }
    }

    /// Iterate entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn limit(&self) -> usize {
        self.max_entries
    }
}

impl<T: PartialEq> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_most_recent_first() {
        let mut history = History::new(10);
        history.push("scene");
        history.push("choice");

        assert_eq!(history.latest(), Some(&"choice"));
        assert_eq!(history.entries().copied().collect::<Vec<_>>(), vec!["choice", "scene"]);
    }

    #[test]
    fn test_duplicates_collapse_to_front() {
        let mut history = History::new(10);
        history.push("a");
        history.push("b");
        history.push("c");
        history.push("a");

        assert_eq!(history.entries().copied().collect::<Vec<_>>(), vec!["a", "c", "b"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_oldest_evicted_first() {
        let mut history = History::default();
        for i in 0..15 {
            history.push(i);
        }

        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.latest(), Some(&14));
        assert_eq!(history.entries().last(), Some(&5));
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(3);
        history.push(1);
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.limit(), 3);
    }
}
