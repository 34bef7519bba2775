//! Playing cards: identity, suit, rank and display flags.
//!
//! A standard deck has 52 cards. Each card has a stable `CardId` derived
//! from its suit and rank, so ids survive every move, snapshot and
//! serialization round trip:
//!
//! ```
//! use klondike_engine::core::{Card, CardId, Suit};
//!
//! let queen = Card::new(Suit::Clubs, 12);
//! assert_eq!(queen.id, CardId::from_suit_rank(Suit::Clubs, 12));
//! assert!(queen.is_black());
//! ```

use serde::{Deserialize, Serialize};

/// Number of cards in a deck.
pub const DECK_SIZE: usize = 52;

/// Number of ranks per suit (Ace..=King).
pub const RANKS_PER_SUIT: u8 = 13;

/// Rank of an Ace.
pub const ACE: u8 = 1;

/// Rank of a King.
pub const KING: u8 = 13;

/// Card suit.
///
/// Declaration order matches the foundation order: hearts, diamonds, clubs, spades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits in foundation order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Zero-based index of this suit (also its foundation index).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Clubs => 2,
            Suit::Spades => 3,
        }
    }

    /// Suit from a zero-based index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Suit> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Derived card color.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

/// Card color, derived from the suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Stable card identifier in `0..52`.
///
/// Layout is suit-major: `suit.index() * 13 + (rank - 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Id of the card with the given suit and rank.
    #[must_use]
    pub const fn from_suit_rank(suit: Suit, rank: u8) -> Self {
        Self(suit.index() as u8 * RANKS_PER_SUIT + (rank - 1))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A playing card.
///
/// `id`, `suit` and `rank` never change. `face_up` and `draggable` are
/// display flags owned by the engine; `draggable` is always recomputed
/// from the layout, never trusted from input.
///
/// Deserialization rejects a rank outside `1..=13` or an id that does not
/// match the suit and rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    /// 1 = Ace, 11 = Jack, 12 = Queen, 13 = King.
    pub rank: u8,
    pub face_up: bool,
    pub draggable: bool,
}

impl Card {
    /// Create a face-down card.
    ///
    /// # Panics
    ///
    /// If `rank` is outside `1..=13`. Use [`Card::try_new`] for untrusted input.
    #[must_use]
    pub fn new(suit: Suit, rank: u8) -> Self {
        match Self::try_new(suit, rank) {
            Some(card) => card,
            None => panic!("rank must be in 1..=13, got {rank}"),
        }
    }

    /// Create a face-down card, or `None` if `rank` is outside `1..=13`.
    #[must_use]
    pub fn try_new(suit: Suit, rank: u8) -> Option<Self> {
        (ACE..=KING).contains(&rank).then(|| Self {
            id: CardId::from_suit_rank(suit, rank),
            suit,
            rank,
            face_up: false,
            draggable: false,
        })
    }

    /// Create a face-up card (builder pattern).
    #[must_use]
    pub fn face_up(mut self) -> Self {
        self.face_up = true;
        self
    }

    /// Card color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.suit.color()
    }

    #[must_use]
    pub const fn is_red(&self) -> bool {
        matches!(self.color(), Color::Red)
    }

    #[must_use]
    pub const fn is_black(&self) -> bool {
        matches!(self.color(), Color::Black)
    }

    /// Same card identity, ignoring display flags.
    #[must_use]
    pub fn same_card(&self, other: &Card) -> bool {
        self.id == other.id
    }

    /// The full ordered deck: hearts Ace..King, diamonds, clubs, spades, all face down.
    #[must_use]
    pub fn full_deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::new(suit, rank)))
            .collect()
    }
}

/// Wire shape of a `Card`, checked before it becomes one.
#[derive(Deserialize)]
struct CardRecord {
    id: CardId,
    suit: Suit,
    rank: u8,
    face_up: bool,
    draggable: bool,
}

impl TryFrom<CardRecord> for Card {
    type Error = String;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let card = Card::try_new(record.suit, record.rank)
            .ok_or_else(|| format!("rank {} is out of range", record.rank))?;
        if card.id != record.id {
            return Err(format!("id {} does not match {card}", record.id.raw()));
        }
        Ok(Card {
            face_up: record.face_up,
            draggable: record.draggable,
            ..card
        })
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        };
        write!(f, "{}{}", rank, self.suit.symbol())
    }
}
