//! Game state: the single unit of truth.
//!
//! ## GameState
//!
//! Complete board snapshot:
//! - Stock, waste, 4 foundations, 7 tableau piles
//! - Move counter, score, win flag
//! - Transient selection
//! - Settings and stock-cycle counter
//! - Deal seed and start timestamp
//!
//! Piles are `im::Vector`s, so cloning a state is O(1) and clones never
//! alias: mutating a clone leaves the original untouched. History entries
//! and every state handed to a caller rely on this.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, DECK_SIZE};
use super::config::GameSettings;
use super::error::EngineError;
use super::position::{CardPosition, PileId, PileKind, FOUNDATION_PILES, TABLEAU_PILES};

/// An ordered pile of cards. The top card is the last element.
pub type Pile = Vector<Card>;

/// Cards picked up by the player, plus where they came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub cards: Vec<Card>,
    pub source: CardPosition,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    // === Piles ===
    pub stock: Pile,
    pub waste: Pile,
    pub foundations: [Pile; FOUNDATION_PILES],
    pub tableau: [Pile; TABLEAU_PILES],

    // === Progress ===
    /// Successful card moves (stock flips not included).
    pub moves: u32,

    /// Running score. May go negative.
    pub score: i32,

    /// All four foundations complete.
    pub is_won: bool,

    /// Times the waste has been recycled into the stock this game.
    pub stock_cycles: u32,

    // === Transient ===
    pub selection: Option<Selection>,

    // === Configuration ===
    pub settings: GameSettings,

    // === Deal ===
    /// Seed the layout was dealt from.
    pub seed: u64,

    /// Milliseconds since the Unix epoch when the game started.
    pub started_at: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::empty(GameSettings::default())
    }
}

impl GameState {
    /// A board with every pile empty.
    #[must_use]
    pub fn empty(settings: GameSettings) -> Self {
        Self {
            stock: Vector::new(),
            waste: Vector::new(),
            foundations: Default::default(),
            tableau: Default::default(),
            moves: 0,
            score: 0,
            is_won: false,
            stock_cycles: 0,
            selection: None,
            settings,
            seed: 0,
            started_at: 0,
        }
    }

    /// Get a pile by id. `None` if the index is out of range.
    #[must_use]
    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        match id.kind {
            PileKind::Stock if id.index == 0 => Some(&self.stock),
            PileKind::Waste if id.index == 0 => Some(&self.waste),
            PileKind::Foundation => self.foundations.get(id.index),
            PileKind::Tableau => self.tableau.get(id.index),
            _ => None,
        }
    }

    /// Get a mutable pile by id. `None` if the index is out of range.
    pub fn pile_mut(&mut self, id: PileId) -> Option<&mut Pile> {
        match id.kind {
            PileKind::Stock if id.index == 0 => Some(&mut self.stock),
            PileKind::Waste if id.index == 0 => Some(&mut self.waste),
            PileKind::Foundation => self.foundations.get_mut(id.index),
            PileKind::Tableau => self.tableau.get_mut(id.index),
            _ => None,
        }
    }

    /// Every pile id in board order: stock, waste, foundations, tableau.
    pub fn pile_ids() -> impl Iterator<Item = PileId> {
        [PileKind::Stock, PileKind::Waste, PileKind::Foundation, PileKind::Tableau]
            .into_iter()
            .flat_map(|kind| (0..kind.pile_count()).map(move |i| PileId::new(kind, i)))
    }

    /// Every pile with its id.
    pub fn piles(&self) -> impl Iterator<Item = (PileId, &Pile)> {
        Self::pile_ids().filter_map(move |id| self.pile(id).map(|p| (id, p)))
    }

    /// Every card on the board with its position.
    pub fn cards(&self) -> impl Iterator<Item = (CardPosition, &Card)> {
        self.piles().flat_map(|(id, pile)| {
            pile.iter()
                .enumerate()
                .map(move |(i, card)| (CardPosition::new(id.kind, id.index, i), card))
        })
    }

    /// Total number of cards across all piles.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.piles().map(|(_, p)| p.len()).sum()
    }

    /// Find a card by id (linear scan over all piles).
    #[must_use]
    pub fn find_card(&self, id: CardId) -> Option<(CardPosition, Card)> {
        self.cards()
            .find(|(_, card)| card.id == id)
            .map(|(pos, card)| (pos, *card))
    }

    /// Card at a position, if any.
    #[must_use]
    pub fn card_at(&self, position: CardPosition) -> Option<&Card> {
        self.pile(position.pile())?.get(position.card_index)
    }

    /// Number of cards on the foundations.
    #[must_use]
    pub fn foundation_count(&self) -> usize {
        self.foundations.iter().map(Vector::len).sum()
    }

    /// Same piles, moves and score as `other`.
    ///
    /// Ignores the selection, settings and timestamps.
    #[must_use]
    pub fn same_position(&self, other: &GameState) -> bool {
        self.stock == other.stock
            && self.waste == other.waste
            && self.foundations == other.foundations
            && self.tableau == other.tableau
            && self.moves == other.moves
            && self.score == other.score
    }

    /// Check that the board is one a real game could reach from a deck.
    ///
    /// Every card must be well formed (rank in `1..=13`, id matching suit
    /// and rank), no card may appear twice, and the settings must be
    /// valid. Partial boards with fewer than 52 cards pass.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen = [false; DECK_SIZE];
        for (position, card) in self.cards() {
            let expected = Card::try_new(card.suit, card.rank).map(|c| c.id);
            if expected != Some(card.id) {
                return Err(EngineError::CorruptState(format!(
                    "malformed card (rank {}, id {}) at {position}",
                    card.rank,
                    card.id.raw()
                )));
            }
            let slot = &mut seen[usize::from(card.id.raw())];
            if *slot {
                return Err(EngineError::CorruptState(format!(
                    "{card} appears more than once (again at {position})"
                )));
            }
            *slot = true;
        }
        self.settings.validate()
    }

    // === Layout builders (mostly for tests and replays) ===

    /// Replace a tableau pile (builder pattern).
    ///
    /// # Panics
    ///
    /// If `index` is not below `TABLEAU_PILES`.
    #[must_use]
    pub fn with_tableau(mut self, index: usize, cards: impl IntoIterator<Item = Card>) -> Self {
        self.tableau[index] = cards.into_iter().collect();
        self
    }

    /// Replace a foundation pile (builder pattern).
    ///
    /// # Panics
    ///
    /// If `index` is not below `FOUNDATION_PILES`.
    #[must_use]
    pub fn with_foundation(mut self, index: usize, cards: impl IntoIterator<Item = Card>) -> Self {
        self.foundations[index] = cards.into_iter().collect();
        self
    }

    /// Replace the waste (builder pattern).
    #[must_use]
    pub fn with_waste(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.waste = cards.into_iter().collect();
        self
    }

    /// Replace the stock (builder pattern).
    #[must_use]
    pub fn with_stock(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.stock = cards.into_iter().collect();
        self
    }
}
