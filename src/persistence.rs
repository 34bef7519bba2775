//! Saving and restoring games.
//!
//! `GameStorage` serializes a `GameState` or `GameSettings` to JSON and
//! hands the string to a `KeyValueStore`. The store is whatever the host
//! has: browser local storage, a file, or the in-memory `MemoryStore`.
//!
//! Loading never fails loudly. Missing keys and corrupt payloads both come
//! back as `None`; corrupt payloads are logged.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{GameSettings, GameState};
use crate::rules::update_draggable_states;

/// Key under which the current game is stored.
pub const GAME_KEY: &str = "klondike.game";
/// Key under which the settings are stored.
pub const SETTINGS_KEY: &str = "klondike.settings";

/// Why a save failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store rejected write to {key}: {reason}")]
    Write { key: String, reason: String },
}

/// A string-keyed string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str);
}

/// In-process store, mostly for tests and headless hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Typed save/load on top of a `KeyValueStore`.
#[derive(Clone, Debug, Default)]
pub struct GameStorage<S> {
    store: S,
}

impl<S: KeyValueStore> GameStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist `state`. The selection is not saved.
    pub fn save_game(&mut self, state: &GameState) -> Result<(), StorageError> {
        let mut state = state.clone();
        state.selection = None;
        let json = serde_json::to_string(&state)?;
        self.store.set(GAME_KEY, json)?;
        debug!(seed = state.seed, moves = state.moves, "game saved");
        Ok(())
    }

    /// Restore the saved game, if there is a readable one.
    ///
    /// A save that parses but fails `GameState::validate` is discarded.
    /// Draggable flags are recomputed rather than trusted.
    pub fn load_game(&self) -> Option<GameState> {
        let mut state: GameState = self.load(GAME_KEY)?;
        if let Err(error) = state.validate() {
            warn!(%error, "discarding inconsistent saved game");
            return None;
        }
        update_draggable_states(&mut state);
        Some(state)
    }

    pub fn save_settings(&mut self, settings: &GameSettings) -> Result<(), StorageError> {
        let json = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, json)
    }

    /// Restore saved settings. Settings that fail validation are dropped.
    pub fn load_settings(&self) -> Option<GameSettings> {
        let settings: GameSettings = self.load(SETTINGS_KEY)?;
        match settings.validate() {
            Ok(()) => Some(settings),
            Err(error) => {
                warn!(%error, "ignoring invalid saved settings");
                None
            }
        }
    }

    /// Forget the saved game and settings.
    pub fn clear(&mut self) {
        self.store.remove(GAME_KEY);
        self.store.remove(SETTINGS_KEY);
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "discarding corrupt saved data");
                None
            }
        }
    }
}
