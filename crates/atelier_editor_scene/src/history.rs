// SPDX-License-Identifier: MIT OR Apache-2.0
//! Linear undo/redo history over immutable snapshots.
//!
//! The history always holds at least one entry. `push` discards any redo
//! branch, and once the capacity is reached the oldest entry is dropped so
//! the newest entry stays current.

use std::collections::VecDeque;

/// Default maximum history depth
pub const MAX_HISTORY: usize = 100;

/// History statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Number of stored entries
    pub entries: usize,
    /// Index of the current entry
    pub index: usize,
    /// Steps available to undo
    pub undo_count: usize,
    /// Steps available to redo
    pub redo_count: usize,
    /// Maximum number of entries
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    index: usize,
    max_depth: usize,
}

impl<T: Clone> History<T> {
    /// Create a history holding `initial` as its only entry
    pub fn new(initial: T) -> Self {
        Self::with_max_depth(initial, MAX_HISTORY)
    }

    /// Create with custom maximum depth (at least one entry is always kept)
    pub fn with_max_depth(initial: T, max_depth: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Record a new entry after the current one
    pub fn push(&mut self, entry: T) {
        // Discard the redo branch
        self.entries.truncate(self.index + 1);
        self.entries.push_back(entry);
        self.index = self.entries.len() - 1;

        // Enforce history limit
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
            self.index -= 1;
        }
    }

    /// Step back and return the entry that is now current
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward and return the entry that is now current
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The current entry
    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least one entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drop everything and restart from `initial`
    pub fn clear(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.index = 0;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            entries: self.entries.len(),
            index: self.index,
            undo_count: self.index,
            redo_count: self.entries.len() - 1 - self.index,
            max_depth: self.max_depth,
        }
    }
}
