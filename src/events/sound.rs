//! Audio cue mapping for a sound adapter.
//!
//! The engine plays nothing. A sound adapter subscribes to the bus and
//! asks `SoundCue::for_event` which cue (if any) an event deserves.

use serde::{Deserialize, Serialize};

use super::event::{EventKind, GameEvent};

/// An audio cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A card landed on a foundation.
    FoundationDrop,
    /// Any other card move.
    CardPlace,
    /// Stock flip or recycle.
    CardFlip,
    /// Rejected action.
    Error,
    /// Fresh deal.
    Shuffle,
    /// Game won.
    Victory,
}

impl SoundCue {
    /// Event kinds a sound adapter should subscribe to.
    pub const EVENT_KINDS: [EventKind; 5] = [
        EventKind::MoveExecuted,
        EventKind::StockFlipped,
        EventKind::InvalidMove,
        EventKind::NewGameStarted,
        EventKind::GameWon,
    ];

    /// The cue for an event, or `None` when it is silent.
    #[must_use]
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event.kind {
            EventKind::MoveExecuted if event.is_foundation_move() => Some(SoundCue::FoundationDrop),
            EventKind::MoveExecuted => Some(SoundCue::CardPlace),
            EventKind::StockFlipped => Some(SoundCue::CardFlip),
            EventKind::InvalidMove => Some(SoundCue::Error),
            EventKind::NewGameStarted => Some(SoundCue::Shuffle),
            EventKind::GameWon => Some(SoundCue::Victory),
            _ => None,
        }
    }
}
