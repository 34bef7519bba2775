//! Pure Klondike rules: placement legality, runs, scoring, win check.
//!
//! Nothing here touches engine state; every function is a predicate or a
//! pure computation over cards and piles.

use im::Vector;

use crate::core::{Card, CardPosition, GameState, PileKind, Suit, ACE, KING, RANKS_PER_SUIT};

/// Points per card moved into a foundation.
pub const FOUNDATION_POINTS: i32 = 10;

/// Points per card moved onto the tableau from the waste or another tableau pile.
pub const TABLEAU_POINTS: i32 = 5;

/// Points per card taken back off a foundation (negative).
pub const FOUNDATION_PENALTY: i32 = -15;

/// Can `card` go on top of a tableau pile?
///
/// Empty piles take Kings only; otherwise the card must be one rank lower
/// than the top card and of the opposite color.
#[must_use]
pub fn can_place_on_tableau(card: &Card, pile: &Vector<Card>) -> bool {
    match pile.back() {
        None => card.rank == KING,
        Some(top) => card.color() != top.color() && top.rank.checked_sub(1) == Some(card.rank),
    }
}

/// Can `card` go on top of a foundation pile?
///
/// Empty foundations take Aces only; otherwise the card must follow the
/// top card in the same suit.
#[must_use]
pub fn can_place_on_foundation(card: &Card, pile: &Vector<Card>) -> bool {
    match pile.back() {
        None => card.rank == ACE,
        Some(top) => card.suit == top.suit && card.rank.checked_sub(1) == Some(top.rank),
    }
}

/// Foundation index for a suit: hearts 0, diamonds 1, clubs 2, spades 3.
#[must_use]
pub const fn foundation_index_for_suit(suit: Suit) -> usize {
    suit.index()
}

/// The foundation `card` can legally go to right now, if any.
///
/// Only the suit-correct pile is ever considered.
#[must_use]
pub fn find_valid_foundation_pile(card: &Card, state: &GameState) -> Option<usize> {
    let index = foundation_index_for_suit(card.suit);
    state
        .foundations
        .get(index)
        .filter(|pile| can_place_on_foundation(card, pile))
        .map(|_| index)
}

/// Is `cards` a descending, alternating-color run?
///
/// Zero or one card is always a valid run.
#[must_use]
pub fn is_valid_card_sequence(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| {
        pair[0].color() != pair[1].color() && pair[0].rank.checked_sub(1) == Some(pair[1].rank)
    })
}

/// The run starting at `start`, if it can be picked up as a unit.
///
/// Returns an empty vec when `start` is out of range, the first card is
/// face down, or the suffix is not a valid run.
#[must_use]
pub fn movable_cards_from_tableau(pile: &Vector<Card>, start: usize) -> Vec<Card> {
    match pile.get(start) {
        Some(first) if first.face_up => {}
        _ => return Vec::new(),
    }
    let run: Vec<Card> = pile.iter().skip(start).copied().collect();
    if is_valid_card_sequence(&run) {
        run
    } else {
        Vec::new()
    }
}

/// The cards that can be picked up at `position`.
///
/// Tableau piles yield the movable run; waste and foundation piles only
/// their face-up top card; the stock nothing.
#[must_use]
pub fn movable_cards_at(state: &GameState, position: CardPosition) -> Vec<Card> {
    let Some(pile) = state.pile(position.pile()) else {
        return Vec::new();
    };
    match position.kind {
        PileKind::Tableau => movable_cards_from_tableau(pile, position.card_index),
        PileKind::Waste | PileKind::Foundation => pile
            .back()
            .filter(|top| top.face_up && position.card_index + 1 == pile.len())
            .map(|top| vec![*top])
            .unwrap_or_default(),
        PileKind::Stock => Vec::new(),
    }
}

/// All four foundations are complete.
#[must_use]
pub fn check_win_condition(state: &GameState) -> bool {
    state
        .foundations
        .iter()
        .all(|pile| pile.len() == RANKS_PER_SUIT as usize)
}

/// Score change for moving `count` cards between pile kinds.
#[must_use]
pub fn calculate_score_for_move(from: PileKind, to: PileKind, count: usize) -> i32 {
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    let per_card = match (from, to) {
        (_, PileKind::Foundation) => FOUNDATION_POINTS,
        (PileKind::Waste | PileKind::Tableau, PileKind::Tableau) => TABLEAU_POINTS,
        (PileKind::Foundation, PileKind::Tableau) => FOUNDATION_PENALTY,
        _ => 0,
    };
    per_card.saturating_mul(count)
}

/// Recompute every `draggable` flag from the layout.
///
/// - Tableau: face up and heading a movable run
/// - Foundation and waste: top card only
/// - Stock: never
pub fn update_draggable_states(state: &mut GameState) {
    state.stock = state
        .stock
        .iter()
        .map(|card| Card { draggable: false, ..*card })
        .collect();

    state.waste = top_only_draggable(&state.waste);
    for pile in &mut state.foundations {
        *pile = top_only_draggable(pile);
    }

    for pile in &mut state.tableau {
        let snapshot = pile.clone();
        *pile = snapshot
            .iter()
            .enumerate()
            .map(|(i, card)| Card {
                draggable: card.face_up && !movable_cards_from_tableau(&snapshot, i).is_empty(),
                ..*card
            })
            .collect();
    }
}

fn top_only_draggable(pile: &Vector<Card>) -> Vector<Card> {
    let last = pile.len().checked_sub(1);
    pile.iter()
        .enumerate()
        .map(|(i, card)| Card {
            draggable: Some(i) == last,
            ..*card
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameSettings, Suit};

    fn up(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).face_up()
    }

    fn pile(cards: &[Card]) -> Vector<Card> {
        cards.iter().copied().collect()
    }

    #[test]
    fn test_tableau_empty_takes_king_only() {
        let empty = Vector::new();
        assert!(can_place_on_tableau(&up(Suit::Spades, 13), &empty));
        assert!(!can_place_on_tableau(&up(Suit::Hearts, 12), &empty));
        assert!(!can_place_on_tableau(&up(Suit::Hearts, 1), &empty));
    }

    #[test]
    fn test_tableau_alternating_descending() {
        let black_seven = pile(&[up(Suit::Clubs, 7)]);
        assert!(can_place_on_tableau(&up(Suit::Hearts, 6), &black_seven));
        assert!(can_place_on_tableau(&up(Suit::Diamonds, 6), &black_seven));
        // Same color
        assert!(!can_place_on_tableau(&up(Suit::Spades, 6), &black_seven));
        // Wrong rank
        assert!(!can_place_on_tableau(&up(Suit::Hearts, 5), &black_seven));
        assert!(!can_place_on_tableau(&up(Suit::Hearts, 8), &black_seven));
    }

    #[test]
    fn test_foundation_rules() {
        let empty = Vector::new();
        assert!(can_place_on_foundation(&up(Suit::Hearts, 1), &empty));
        assert!(!can_place_on_foundation(&up(Suit::Hearts, 2), &empty));

        let hearts = pile(&[up(Suit::Hearts, 1), up(Suit::Hearts, 2)]);
        assert!(can_place_on_foundation(&up(Suit::Hearts, 3), &hearts));
        assert!(!can_place_on_foundation(&up(Suit::Diamonds, 3), &hearts));
        assert!(!can_place_on_foundation(&up(Suit::Hearts, 4), &hearts));
    }

    #[test]
    fn test_foundation_index_for_suit() {
        assert_eq!(foundation_index_for_suit(Suit::Hearts), 0);
        assert_eq!(foundation_index_for_suit(Suit::Diamonds), 1);
        assert_eq!(foundation_index_for_suit(Suit::Clubs), 2);
        assert_eq!(foundation_index_for_suit(Suit::Spades), 3);
    }

    #[test]
    fn test_find_valid_foundation_pile() {
        let state = GameState::default().with_foundation(2, [up(Suit::Clubs, 1)]);

        assert_eq!(find_valid_foundation_pile(&up(Suit::Clubs, 2), &state), Some(2));
        assert_eq!(find_valid_foundation_pile(&up(Suit::Spades, 1), &state), Some(3));
        // Another suit's empty pile is never chosen for a non-Ace
        assert_eq!(find_valid_foundation_pile(&up(Suit::Hearts, 2), &state), None);
        assert_eq!(find_valid_foundation_pile(&up(Suit::Clubs, 3), &state), None);
    }

    #[test]
    fn test_card_sequences() {
        assert!(is_valid_card_sequence(&[]));
        assert!(is_valid_card_sequence(&[up(Suit::Hearts, 4)]));
        assert!(is_valid_card_sequence(&[
            up(Suit::Spades, 9),
            up(Suit::Hearts, 8),
            up(Suit::Clubs, 7),
        ]));
        assert!(!is_valid_card_sequence(&[up(Suit::Spades, 9), up(Suit::Clubs, 8)]));
        assert!(!is_valid_card_sequence(&[up(Suit::Spades, 9), up(Suit::Hearts, 7)]));
        assert!(!is_valid_card_sequence(&[up(Suit::Hearts, 8), up(Suit::Spades, 9)]));
    }

    #[test]
    fn test_rank_extremes_do_not_overflow() {
        let mut low = up(Suit::Hearts, 1);
        low.rank = 0;
        let mut high = up(Suit::Spades, 13);
        high.rank = u8::MAX;

        assert!(!is_valid_card_sequence(&[low, high]));
        assert!(!is_valid_card_sequence(&[high, low]));
        assert!(!can_place_on_tableau(&high, &pile(&[low])));
        assert!(!can_place_on_tableau(&low, &pile(&[low])));
        assert!(!can_place_on_foundation(&low, &pile(&[high])));
    }

    #[test]
    fn test_movable_cards_from_tableau() {
        let column = pile(&[
            Card::new(Suit::Diamonds, 2),
            up(Suit::Spades, 9),
            up(Suit::Hearts, 8),
            up(Suit::Clubs, 7),
        ]);

        assert_eq!(movable_cards_from_tableau(&column, 1).len(), 3);
        assert_eq!(movable_cards_from_tableau(&column, 3).len(), 1);
        // Face-down start
        assert!(movable_cards_from_tableau(&column, 0).is_empty());
        // Out of range
        assert!(movable_cards_from_tableau(&column, 4).is_empty());

        let broken = pile(&[up(Suit::Spades, 9), up(Suit::Clubs, 8), up(Suit::Hearts, 7)]);
        assert!(movable_cards_from_tableau(&broken, 0).is_empty());
        assert_eq!(movable_cards_from_tableau(&broken, 1).len(), 2);
    }

    #[test]
    fn test_movable_cards_at() {
        let state = GameState::default()
            .with_stock([Card::new(Suit::Clubs, 5)])
            .with_waste([up(Suit::Hearts, 3), up(Suit::Hearts, 4)])
            .with_tableau(0, [up(Suit::Spades, 9), up(Suit::Hearts, 8)]);

        assert_eq!(movable_cards_at(&state, CardPosition::tableau(0, 0)).len(), 2);
        assert_eq!(movable_cards_at(&state, CardPosition::waste(1)), vec![up(Suit::Hearts, 4)]);
        assert!(movable_cards_at(&state, CardPosition::waste(0)).is_empty());
        assert!(movable_cards_at(&state, CardPosition::stock(0)).is_empty());
        assert!(movable_cards_at(&state, CardPosition::tableau(9, 0)).is_empty());
    }

    #[test]
    fn test_win_condition() {
        let mut state = GameState::default();
        for suit in Suit::ALL {
            let cards: Vec<Card> = (1..=13).map(|r| up(suit, r)).collect();
            state = state.with_foundation(suit.index(), cards);
        }
        assert!(check_win_condition(&state));

        // 13 + 0 + 13 + 13
        state.foundations[1].clear();
        assert!(!check_win_condition(&state));

        assert!(!check_win_condition(&GameState::default()));
    }

    #[test]
    fn test_scoring() {
        assert_eq!(calculate_score_for_move(PileKind::Waste, PileKind::Foundation, 1), 10);
        assert_eq!(calculate_score_for_move(PileKind::Tableau, PileKind::Foundation, 1), 10);
        assert_eq!(calculate_score_for_move(PileKind::Waste, PileKind::Tableau, 1), 5);
        assert_eq!(calculate_score_for_move(PileKind::Tableau, PileKind::Tableau, 3), 15);
        assert_eq!(calculate_score_for_move(PileKind::Foundation, PileKind::Tableau, 1), -15);
        assert_eq!(calculate_score_for_move(PileKind::Stock, PileKind::Waste, 3), 0);
    }

    #[test]
    fn test_update_draggable_states() {
        let mut state = GameState::empty(GameSettings::default())
            .with_stock([Card::new(Suit::Clubs, 1), Card::new(Suit::Clubs, 2)])
            .with_waste([up(Suit::Hearts, 3), up(Suit::Hearts, 4)])
            .with_foundation(3, [up(Suit::Spades, 1), up(Suit::Spades, 2)])
            .with_tableau(
                0,
                [
                    Card::new(Suit::Diamonds, 13),
                    up(Suit::Spades, 10),
                    up(Suit::Clubs, 9),
                    up(Suit::Hearts, 8),
                ],
            );

        update_draggable_states(&mut state);

        assert!(state.stock.iter().all(|c| !c.draggable));
        assert_eq!(
            state.waste.iter().map(|c| c.draggable).collect::<Vec<_>>(),
            vec![false, true]
        );
        assert_eq!(
            state.foundations[3].iter().map(|c| c.draggable).collect::<Vec<_>>(),
            vec![false, true]
        );
        // Face-down, broken run head, valid run head, single top
        assert_eq!(
            state.tableau[0].iter().map(|c| c.draggable).collect::<Vec<_>>(),
            vec![false, false, true, true]
        );
    }
}
