//! Bounded, linear undo/redo log of full state snapshots.
//!
//! Entries before the cursor are undo steps, entries at or after it are
//! redo steps. Undo and redo swap the live state with the entry under the
//! cursor, so the log always holds exactly the states one can travel to.
//!
//! ```text
//!   entries: [ s0 | s1 | s2 | r0 | r1 ]
//!                          ^ cursor
//! ```
//!
//! Pushing truncates everything from the cursor on (the redo branch), then
//! evicts from the front once the bound is exceeded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{now_millis, GameState, DEFAULT_MAX_HISTORY};

/// A snapshot with the label of the action it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub state: GameState,
    pub timestamp: u64,
    pub label: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(state: GameState, label: impl Into<String>) -> Self {
        Self {
            state,
            timestamp: now_millis(),
            label: label.into(),
        }
    }
}

/// Linear history with a cursor.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    max_len: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryStore {
    /// Create an empty store keeping at most `max_len` entries (minimum 1).
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_len: max_len.max(1),
        }
    }

    /// Record a snapshot, discarding any redo branch.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Step back: returns the snapshot to restore and stores `current`
    /// in its place as the redo step.
    pub fn undo(&mut self, current: GameState) -> Option<HistoryEntry> {
        let index = self.cursor.checked_sub(1)?;
        let slot = self.entries.get_mut(index)?;
        let replacement = HistoryEntry::new(current, slot.label.clone());
        let restored = std::mem::replace(slot, replacement);
        self.cursor = index;
        Some(restored)
    }

    /// Step forward: returns the snapshot to restore and stores `current`
    /// in its place as the undo step.
    pub fn redo(&mut self, current: GameState) -> Option<HistoryEntry> {
        let slot = self.entries.get_mut(self.cursor)?;
        let replacement = HistoryEntry::new(current, slot.label.clone());
        let restored = std::mem::replace(slot, replacement);
        self.cursor += 1;
        Some(restored)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Number of stored entries (undo and redo).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cursor position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// The entry the next `undo` would restore.
    #[must_use]
    pub fn next_undo(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor.checked_sub(1)?)
    }

    /// The entry the next `redo` would restore.
    #[must_use]
    pub fn next_redo(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Labels of the undoable actions, oldest first.
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().take(self.cursor).map(|e| e.label.as_str())
    }
}
