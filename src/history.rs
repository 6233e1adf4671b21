// Bounded in-memory history for the dashboard charts

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::HistoryEntry;

/// Default number of polls kept.
pub const DEFAULT_CAPACITY: usize = 60;

/// Sliding window of the most recent entries, oldest first. Not persisted.
#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append, evicting the oldest entry once full.
    pub fn push(&self, entry: HistoryEntry) {
        let mut entries = match self.entries.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Point-in-time copy, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        match self.entries.lock() {
            Ok(g) => g.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(g) => g.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
