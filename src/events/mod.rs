//! Event notifications for listeners outside the engine.
//!
//! ## Key Components
//!
//! - [`EventKind`]: what happened (move, flip, win, ...)
//! - [`GameEvent`]: a kind plus payload and timestamp
//! - [`EventBus`]: ordered per-kind listener lists with failure isolation
//! - [`SoundCue`]: event → audio cue mapping for a sound adapter
//!
//! Listeners are fire-and-forget: the engine never waits on them and a
//! failing listener never affects the game or the other listeners.

mod bus;
mod event;
mod sound;

pub use bus::{listener, EventBus, Listener};
pub use event::{EventKind, EventPayload, FlipAction, GameEvent};
pub use sound::SoundCue;
