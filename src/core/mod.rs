//! Core engine types: cards, positions, state, settings, errors, RNG.
//!
//! Everything here is plain data. Rules live in `rules`, mutation goes
//! through `history::StateManager`.

pub mod card;
pub mod clock;
pub mod config;
pub mod error;
pub mod position;
pub mod rng;
pub mod state;

pub use card::{Card, CardId, Color, Suit, ACE, DECK_SIZE, KING, RANKS_PER_SUIT};
pub use clock::now_millis;
pub use config::{EngineConfig, GameSettings, SettingsPatch, DEFAULT_MAX_HISTORY};
pub use error::{EngineError, ErrorKind, ListenerError};
pub use position::{CardPosition, PileId, PileKind, FOUNDATION_PILES, TABLEAU_PILES};
pub use rng::GameRng;
pub use state::{GameState, Pile, Selection};
