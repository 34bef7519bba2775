//! # klondike-engine
//!
//! Rule-and-state engine for Klondike solitaire: the UI sends player
//! intents, the engine decides legality, commits the next state and
//! notifies subscribers.
//!
//! ## Design Principles
//!
//! 1. **Immutable Transitions**: Every action computes a new `GameState`
//!    from a copy of the committed one. A rejected action leaves no trace.
//!
//! 2. **Errors Are Values**: Nothing panics across the public API. Every
//!    failure is an `EngineError` with a category and a reason.
//!
//! 3. **Single-Threaded, Run-to-Completion**: Actions and listener
//!    callbacks run synchronously on the caller's thread.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Piles are `im::Vector`s, so the undo
//!   history stores full snapshots at O(1) clone cost.
//!
//! - **Deterministic Deals**: A seed fully determines the layout.
//!
//! ## Modules
//!
//! - `core`: Cards, positions, state, settings, errors, RNG
//! - `rules`: Legality predicates, move validation/execution, stock, hints
//! - `history`: Bounded undo/redo log and the state manager
//! - `events`: Event types, the event bus, sound cues
//! - `actions`: The orchestrator that commits actions and emits events
//! - `engine`: `KlondikeEngine`, the facade the UI talks to
//! - `deal`: Seeded initial layout
//! - `persistence`: Save/load through a key-value store

pub mod core;
pub mod rules;
pub mod history;
pub mod events;
pub mod actions;
pub mod deal;
pub mod engine;
pub mod persistence;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, Color, Suit,
    CardPosition, PileId, PileKind,
    GameState, Pile, Selection,
    EngineConfig, GameSettings, SettingsPatch,
    EngineError, ErrorKind, ListenerError,
    GameRng,
};

pub use crate::rules::{Hint, MoveResult, ValidatedMove};

pub use crate::history::{HistoryEntry, HistoryStore, StateManager};

pub use crate::events::{
    listener, EventBus, EventKind, EventPayload, FlipAction, GameEvent, Listener, SoundCue,
};

pub use crate::actions::{ActionContext, ActionOrchestrator, ActivateOutcome};

pub use crate::deal::deal;

pub use crate::engine::KlondikeEngine;

pub use crate::persistence::{GameStorage, KeyValueStore, MemoryStore, StorageError};
