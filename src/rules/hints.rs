//! Hint search: the first productive move on the board.
//!
//! Priority:
//! 1. Waste top or tableau top to a foundation
//! 2. Tableau run to another tableau pile, if it uncovers a card or empties
//!    a pile for a King
//! 3. Waste top to the tableau
//!
//! Moves that only shuffle a King run between empty piles are skipped.

use serde::{Deserialize, Serialize};

use super::predicates::{find_valid_foundation_pile, movable_cards_at};
use super::validator::validate_move;
use crate::core::{Card, CardPosition, GameState, KING};

/// A suggested move, ready to pass to the move operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub from: CardPosition,
    pub to: CardPosition,
    pub cards: Vec<Card>,
}

/// Find a hint for the current layout.
#[must_use]
pub fn find_hint(state: &GameState) -> Option<Hint> {
    foundation_hint(state)
        .or_else(|| tableau_hint(state))
        .or_else(|| waste_to_tableau_hint(state))
}

fn waste_top(state: &GameState) -> Option<CardPosition> {
    state.waste.len().checked_sub(1).map(CardPosition::waste)
}

fn checked(state: &GameState, from: CardPosition, to: CardPosition) -> Option<Hint> {
    let cards = movable_cards_at(state, from);
    validate_move(state, from, to, &cards).ok().map(|_| Hint { from, to, cards })
}

fn foundation_hint(state: &GameState) -> Option<Hint> {
    let tableau_tops = state
        .tableau
        .iter()
        .enumerate()
        .filter_map(|(i, pile)| pile.len().checked_sub(1).map(|top| CardPosition::tableau(i, top)));

    waste_top(state)
        .into_iter()
        .chain(tableau_tops)
        .find_map(|from| {
            let card = state.card_at(from)?;
            let index = find_valid_foundation_pile(card, state)?;
            checked(state, from, CardPosition::foundation(index, state.foundations[index].len()))
        })
}

fn tableau_hint(state: &GameState) -> Option<Hint> {
    for (src, pile) in state.tableau.iter().enumerate() {
        // Head of the face-up part of the pile
        let Some(head) = pile.iter().position(|c| c.face_up) else {
            continue;
        };
        if head == 0 && pile.front().is_some_and(|c| c.rank == KING) {
            continue;
        }
        let from = CardPosition::tableau(src, head);
        for (dst, target) in state.tableau.iter().enumerate() {
            if dst == src {
                continue;
            }
            if let Some(hint) = checked(state, from, CardPosition::tableau(dst, target.len())) {
                return Some(hint);
            }
        }
    }
    None
}

fn waste_to_tableau_hint(state: &GameState) -> Option<Hint> {
    let from = waste_top(state)?;
    state
        .tableau
        .iter()
        .enumerate()
        .find_map(|(dst, target)| checked(state, from, CardPosition::tableau(dst, target.len())))
}
