//! Owner of the current game state.
//!
//! Every committed mutation goes through `set_state` or `update_state`,
//! which record the pre-mutation snapshot first. Reads hand out copies.

use tracing::debug;

use super::store::{HistoryEntry, HistoryStore};
use crate::core::GameState;

/// Holds the live state and its undo history.
#[derive(Clone, Debug, Default)]
pub struct StateManager {
    current: GameState,
    history: HistoryStore,
}

impl StateManager {
    /// Create a manager with the given initial state and history bound.
    #[must_use]
    pub fn new(initial: GameState, max_history: usize) -> Self {
        Self {
            current: initial,
            history: HistoryStore::new(max_history),
        }
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.current.clone()
    }

    /// Borrow the current state without copying.
    #[must_use]
    pub fn peek(&self) -> &GameState {
        &self.current
    }

    /// Replace the state, recording the previous one under `label`.
    pub fn set_state(&mut self, new_state: GameState, label: &str) {
        let previous = std::mem::replace(&mut self.current, new_state);
        self.history.push(HistoryEntry::new(previous, label));
        debug!(label, history = self.history.len(), "state committed");
    }

    /// Compute the next state from a copy of the current one and commit it.
    pub fn update_state<F>(&mut self, update: F, label: &str)
    where
        F: FnOnce(GameState) -> GameState,
    {
        let next = update(self.current.clone());
        self.set_state(next, label);
    }

    /// Replace transient fields without recording history.
    ///
    /// Only for data that is not gameplay-significant, such as the selection.
    pub fn update_transient<F>(&mut self, update: F)
    where
        F: FnOnce(&mut GameState),
    {
        update(&mut self.current);
    }

    /// Install a fresh state and forget all history.
    pub fn reset(&mut self, state: GameState) {
        self.current = state;
        self.history.clear();
    }

    /// Restore the previous snapshot. Returns the restored state.
    pub fn undo(&mut self) -> Option<GameState> {
        let entry = self.history.undo(self.current.clone())?;
        debug!(label = %entry.label, "undo");
        self.current = entry.state;
        Some(self.current.clone())
    }

    /// Re-apply an undone snapshot. Returns the restored state.
    pub fn redo(&mut self) -> Option<GameState> {
        let entry = self.history.redo(self.current.clone())?;
        debug!(label = %entry.label, "redo");
        self.current = entry.state;
        Some(self.current.clone())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}
