//! Initial layout generation.
//!
//! A deal is a pure function of its seed: shuffle the 52-card deck with a
//! `GameRng`, lay out seven tableau piles of 1..=7 cards with only the top
//! card face up, and leave the remaining 24 cards face down in the stock.

use crate::core::{Card, GameRng, GameSettings, GameState};
use crate::rules::update_draggable_states;

/// Number of cards left in the stock after dealing.
pub const STOCK_AFTER_DEAL: usize = 24;

/// The shuffled deck for `seed`, all cards face down.
#[must_use]
pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = Card::full_deck();
    GameRng::new(seed).shuffle(&mut deck);
    deck
}

/// Deal a fresh game from `seed`.
///
/// The returned state has zero moves and score, no selection, and
/// `started_at` left at 0 for the caller to stamp.
#[must_use]
pub fn deal(seed: u64, settings: GameSettings) -> GameState {
    let mut deck = shuffled_deck(seed).into_iter();
    let mut state = GameState::empty(settings);
    state.seed = seed;

    for (index, pile) in state.tableau.iter_mut().enumerate() {
        for position in 0..=index {
            if let Some(mut card) = deck.next() {
                card.face_up = position == index;
                pile.push_back(card);
            }
        }
    }

    state.stock = deck.collect();
    update_draggable_states(&mut state);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DECK_SIZE;

    #[test]
    fn test_deal_shape() {
        let state = deal(42, GameSettings::default());

        for (i, pile) in state.tableau.iter().enumerate() {
            assert_eq!(pile.len(), i + 1);
            assert!(pile.back().unwrap().face_up);
            assert!(pile.iter().take(i).all(|card| !card.face_up));
        }
        assert_eq!(state.stock.len(), STOCK_AFTER_DEAL);
        assert!(state.stock.iter().all(|card| !card.face_up && !card.draggable));
        assert!(state.waste.is_empty());
        assert!(state.foundations.iter().all(|f| f.is_empty()));
        assert_eq!(state.card_count(), DECK_SIZE);
        assert_eq!(state.seed, 42);
    }

    #[test]
    fn test_deal_is_deterministic() {
        let a = deal(1234, GameSettings::default());
        let b = deal(1234, GameSettings::default());
        assert_eq!(a, b);

        let c = deal(1235, GameSettings::default());
        assert_ne!(a.tableau, c.tableau);
    }

    #[test]
    fn test_deal_has_every_card_once() {
        let state = deal(7, GameSettings::default());
        let mut ids: Vec<u8> = state.cards().map(|(_, c)| c.id.raw()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..52).collect::<Vec<u8>>());
    }

    #[test]
    fn test_top_cards_are_draggable() {
        let state = deal(3, GameSettings::default());
        for pile in &state.tableau {
            assert!(pile.back().unwrap().draggable);
        }
    }
}
