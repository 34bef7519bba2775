//! Pile kinds and card locators.

use serde::{Deserialize, Serialize};

/// Number of tableau piles.
pub const TABLEAU_PILES: usize = 7;

/// Number of foundation piles.
pub const FOUNDATION_PILES: usize = 4;

/// The four kinds of pile on a Klondike board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PileKind {
    /// Face-down draw source (one pile).
    Stock,
    /// Face-up cards drawn from the stock (one pile).
    Waste,
    /// Suit build piles, Ace to King (four piles).
    Foundation,
    /// Main board, King to Ace alternating color (seven piles).
    Tableau,
}

impl PileKind {
    /// How many piles of this kind exist.
    #[must_use]
    pub const fn pile_count(self) -> usize {
        match self {
            PileKind::Stock | PileKind::Waste => 1,
            PileKind::Foundation => FOUNDATION_PILES,
            PileKind::Tableau => TABLEAU_PILES,
        }
    }
}

impl std::fmt::Display for PileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PileKind::Stock => "stock",
            PileKind::Waste => "waste",
            PileKind::Foundation => "foundation",
            PileKind::Tableau => "tableau",
        };
        f.write_str(name)
    }
}

/// Identifies one pile: its kind plus index within that kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PileId {
    pub kind: PileKind,
    pub index: usize,
}

impl PileId {
    #[must_use]
    pub const fn new(kind: PileKind, index: usize) -> Self {
        Self { kind, index }
    }

    #[must_use]
    pub const fn stock() -> Self {
        Self::new(PileKind::Stock, 0)
    }

    #[must_use]
    pub const fn waste() -> Self {
        Self::new(PileKind::Waste, 0)
    }

    #[must_use]
    pub const fn foundation(index: usize) -> Self {
        Self::new(PileKind::Foundation, index)
    }

    #[must_use]
    pub const fn tableau(index: usize) -> Self {
        Self::new(PileKind::Tableau, index)
    }

    /// Whether the index is within range for the pile kind.
    #[must_use]
    pub const fn in_range(self) -> bool {
        self.index < self.kind.pile_count()
    }
}

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            PileKind::Stock | PileKind::Waste => write!(f, "{}", self.kind),
            _ => write!(f, "{}[{}]", self.kind, self.index),
        }
    }
}

/// Locates a card: pile kind, pile index (0 for stock/waste) and the
/// card's index within that pile.
///
/// As a move destination only the pile matters: cards are always appended
/// to the end, so `card_index` is advisory there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardPosition {
    pub kind: PileKind,
    pub pile_index: usize,
    pub card_index: usize,
}

impl CardPosition {
    #[must_use]
    pub const fn new(kind: PileKind, pile_index: usize, card_index: usize) -> Self {
        Self { kind, pile_index, card_index }
    }

    #[must_use]
    pub const fn stock(card_index: usize) -> Self {
        Self::new(PileKind::Stock, 0, card_index)
    }

    #[must_use]
    pub const fn waste(card_index: usize) -> Self {
        Self::new(PileKind::Waste, 0, card_index)
    }

    #[must_use]
    pub const fn foundation(pile_index: usize, card_index: usize) -> Self {
        Self::new(PileKind::Foundation, pile_index, card_index)
    }

    #[must_use]
    pub const fn tableau(pile_index: usize, card_index: usize) -> Self {
        Self::new(PileKind::Tableau, pile_index, card_index)
    }

    /// The pile this position lives in.
    #[must_use]
    pub const fn pile(self) -> PileId {
        PileId::new(self.kind, self.pile_index)
    }
}

impl std::fmt::Display for CardPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.pile(), self.card_index)
    }
}
