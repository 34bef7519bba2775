//! Undo history and the owner of the live state.
//!
//! - [`HistoryStore`]: bounded linear log of snapshots
//! - [`StateManager`]: the single current `GameState`, committing through history

mod manager;
mod store;

pub use manager::StateManager;
pub use store::{HistoryEntry, HistoryStore};
