//! Engine error taxonomy.
//!
//! Every failure is a value: nothing is thrown across the public API.
//! Each error belongs to one `ErrorKind`, whose label is the short reason
//! category surfaced to the UI (for example "rule violation").

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::CardId;
use super::position::{CardPosition, PileId, PileKind};

/// Broad error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed request: empty or broken card run, bad setting.
    Input,
    /// Locator does not match the layout.
    Locator,
    /// The layout forbids the placement.
    RuleViolation,
    /// Nothing left to draw or recycle.
    Resource,
    /// Unexpected internal fault; no state was changed.
    Execution,
}

impl ErrorKind {
    /// Human-readable category label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ErrorKind::Input => "input error",
            ErrorKind::Locator => "locator error",
            ErrorKind::RuleViolation => "rule violation",
            ErrorKind::Resource => "resource error",
            ErrorKind::Execution => "execution error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why an action was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    #[error("no cards to move")]
    EmptySelection,

    #[error("cards do not form a valid descending alternating run")]
    InvalidSequence,

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("inconsistent game state: {0}")]
    CorruptState(String),

    #[error("pile {0} does not exist")]
    PileOutOfRange(PileId),

    #[error("no card at {0}")]
    CardIndexOutOfRange(CardPosition),

    #[error("can only move cards from the end of a pile")]
    NotEndOfPile,

    #[error("card {0} is not on the board")]
    CardNotFound(CardId),

    #[error("face-down cards cannot be moved")]
    FaceDownCard,

    #[error("nothing can be picked up at {0}")]
    NotMovable(CardPosition),

    #[error("only the top card of the {0} can be moved")]
    SingleCardOnly(PileKind),

    #[error("cannot place {card} on tableau[{pile}]")]
    IllegalTableauPlacement { card: String, pile: usize },

    #[error("no foundation accepts {0}")]
    NoFoundationTarget(String),

    #[error("only a single card can be moved to a foundation")]
    FoundationTakesOneCard,

    #[error("cannot move cards onto the {0}")]
    InvalidDestination(PileKind),

    #[error("cards are already on that pile")]
    SamePile,

    #[error("stock and waste are both empty")]
    StockEmpty,

    #[error("deck cycling limit of {0} reached")]
    CyclingLimitReached(u32),

    #[error("no automatic move available")]
    NoAutoMoveTarget,

    #[error("internal error: {0}")]
    Execution(String),
}

impl EngineError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptySelection
            | EngineError::InvalidSequence
            | EngineError::InvalidSetting(_)
            | EngineError::CorruptState(_) => ErrorKind::Input,
            EngineError::PileOutOfRange(_)
            | EngineError::CardIndexOutOfRange(_)
            | EngineError::NotEndOfPile
            | EngineError::CardNotFound(_) => ErrorKind::Locator,
            EngineError::FaceDownCard
            | EngineError::NotMovable(_)
            | EngineError::SingleCardOnly(_)
            | EngineError::IllegalTableauPlacement { .. }
            | EngineError::NoFoundationTarget(_)
            | EngineError::FoundationTakesOneCard
            | EngineError::InvalidDestination(_)
            | EngineError::SamePile
            | EngineError::NoAutoMoveTarget => ErrorKind::RuleViolation,
            EngineError::StockEmpty | EngineError::CyclingLimitReached(_) => ErrorKind::Resource,
            EngineError::Execution(_) => ErrorKind::Execution,
        }
    }

    /// Short reason category, e.g. "rule violation".
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.kind().label()
    }
}

/// Failure reported by an event listener.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
