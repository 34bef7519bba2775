//! Game event types.
//!
//! Events are notifications broadcast after every state-affecting action.
//! They carry enough context for a listener to react without reading the
//! engine: what moved where, why a move failed, which seed was dealt.

use serde::{Deserialize, Serialize};

use crate::core::{now_millis, Card, CardPosition, EngineError, PileId, PileKind};

/// Event kind. Listeners subscribe per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    StateChanged,
    MoveExecuted,
    StockFlipped,
    GameWon,
    GameStarted,
    NewGameStarted,
    CardSelected,
    InvalidMove,
    UndoExecuted,
    RedoExecuted,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [EventKind; 10] = [
        EventKind::StateChanged,
        EventKind::MoveExecuted,
        EventKind::StockFlipped,
        EventKind::GameWon,
        EventKind::GameStarted,
        EventKind::NewGameStarted,
        EventKind::CardSelected,
        EventKind::InvalidMove,
        EventKind::UndoExecuted,
        EventKind::RedoExecuted,
    ];
}

/// What a stock flip did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAction {
    /// Cards moved from stock to waste.
    Flip,
    /// The waste was turned back into the stock.
    Recycle,
}

/// Event data, one variant per kind of context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// No extra data.
    None,

    /// A committed card move.
    Move {
        from: PileId,
        to: PileId,
        cards: Vec<Card>,
        score_delta: i32,
    },

    /// A committed stock flip or recycle.
    Stock { action: FlipAction, count: usize },

    /// The final score of a won game.
    Won { score: i32, moves: u32 },

    /// A fresh deal.
    Deal { seed: u64 },

    /// Cards picked up by the player.
    Selection { source: CardPosition, cards: Vec<Card> },

    /// A rejected action.
    Rejected { error: EngineError },

    /// The action label restored by undo/redo or committed.
    Label(String),
}

/// A broadcast notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub payload: EventPayload,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl GameEvent {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind, payload: EventPayload) -> Self {
        Self {
            kind,
            payload,
            timestamp: now_millis(),
        }
    }

    /// Generic "something changed" notification.
    pub fn state_changed(label: impl Into<String>) -> Self {
        Self::new(EventKind::StateChanged, EventPayload::Label(label.into()))
    }

    pub fn move_executed(from: PileId, to: PileId, cards: Vec<Card>, score_delta: i32) -> Self {
        Self::new(
            EventKind::MoveExecuted,
            EventPayload::Move { from, to, cards, score_delta },
        )
    }

    pub fn stock_flipped(action: FlipAction, count: usize) -> Self {
        Self::new(EventKind::StockFlipped, EventPayload::Stock { action, count })
    }

    /// First committed move of a deal.
    pub fn game_started() -> Self {
        Self::new(EventKind::GameStarted, EventPayload::None)
    }

    pub fn game_won(score: i32, moves: u32) -> Self {
        Self::new(EventKind::GameWon, EventPayload::Won { score, moves })
    }

    pub fn new_game_started(seed: u64) -> Self {
        Self::new(EventKind::NewGameStarted, EventPayload::Deal { seed })
    }

    pub fn card_selected(source: CardPosition, cards: Vec<Card>) -> Self {
        Self::new(EventKind::CardSelected, EventPayload::Selection { source, cards })
    }

    pub fn invalid_move(error: EngineError) -> Self {
        Self::new(EventKind::InvalidMove, EventPayload::Rejected { error })
    }

    pub fn undo_executed(label: impl Into<String>) -> Self {
        Self::new(EventKind::UndoExecuted, EventPayload::Label(label.into()))
    }

    pub fn redo_executed(label: impl Into<String>) -> Self {
        Self::new(EventKind::RedoExecuted, EventPayload::Label(label.into()))
    }

    /// Whether this is a move that landed on a foundation.
    #[must_use]
    pub fn is_foundation_move(&self) -> bool {
        matches!(
            &self.payload,
            EventPayload::Move { to, .. } if to.kind == PileKind::Foundation
        )
    }

    /// The rejection, for `InvalidMove` events.
    #[must_use]
    pub fn error(&self) -> Option<&EngineError> {
        match &self.payload {
            EventPayload::Rejected { error } => Some(error),
            _ => None,
        }
    }
}
