//! Bounded history of recently generated exercise prompts.
//!
//! Kept so that generation prompts can tell the model what to avoid
//! repeating. Owned by the application state, shared across handlers.

use std::collections::VecDeque;
use std::sync::Mutex;

/// At most this many entries are retained; the oldest is evicted first.
const CAPACITY: usize = 20;

/// Entries are truncated to this many characters before storage; the
/// leading text is enough for the model to recognize a repeat.
const ENTRY_PREFIX_LEN: usize = 100;

/// Bounded deque of recent exercise texts.
#[derive(Default)]
pub struct PromptHistory {
    entries: Mutex<VecDeque<String>>,
}

impl PromptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generated exercise, evicting the oldest entry at capacity.
    pub fn push(&self, exercise: &str) {
        let entry: String = exercise.chars().take(ENTRY_PREFIX_LEN).collect();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_evicts_oldest() {
        let history = PromptHistory::new();
        for i in 0..25 {
            history.push(&format!("exercise {}", i));
        }
        assert_eq!(history.len(), CAPACITY);

        let recent = history.recent(CAPACITY);
        assert_eq!(recent.first().map(String::as_str), Some("exercise 5"));
        assert_eq!(recent.last().map(String::as_str), Some("exercise 24"));
    }

    #[test]
    fn entries_are_truncated() {
        let history = PromptHistory::new();
        history.push(&"x".repeat(500));
        assert_eq!(history.recent(1)[0].len(), ENTRY_PREFIX_LEN);
    }

    #[test]
    fn recent_returns_newest_n_oldest_first() {
        let history = PromptHistory::new();
        history.push("a");
        history.push("b");
        history.push("c");
        assert_eq!(history.recent(2), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(history.recent(10).len(), 3);
    }
}
