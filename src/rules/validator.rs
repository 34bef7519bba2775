//! Move validation and execution.
//!
//! `attempt` is the board's transition function: it proves a move legal
//! and produces the next state, or rejects it without touching anything.
//! Work happens on a private copy of the state, so a failure at any step
//! leaves no trace.
//!
//! ## Gates (first failure wins)
//!
//! 1. The cards form a non-empty valid run
//! 2. The source pile exists
//! 3. The cards are exactly the source pile's tail, face up
//! 4. The destination accepts them (foundation index is recomputed)
//!
//! `validate_move` runs the gates only; `attempt` also executes.

use smallvec::SmallVec;
use tracing::debug;

use super::predicates::{
    calculate_score_for_move, can_place_on_tableau, check_win_condition,
    find_valid_foundation_pile, is_valid_card_sequence, update_draggable_states,
};
use crate::core::{Card, CardPosition, EngineError, GameState, PileId, PileKind};

/// Outcome of an attempted transition: the next state, or why not.
pub type MoveResult = Result<GameState, EngineError>;

/// A move that passed every gate, with its resolved piles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedMove {
    pub source: PileId,
    /// Always the pile the cards will land on; for foundations this is the
    /// suit-correct pile regardless of the index requested.
    pub destination: PileId,
    pub cards: SmallVec<[Card; 13]>,
}

impl ValidatedMove {
    /// Number of cards moved.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// Check a move without executing it.
pub fn validate_move(
    state: &GameState,
    from: CardPosition,
    to: CardPosition,
    cards: &[Card],
) -> Result<ValidatedMove, EngineError> {
    // 1. Input
    let first = cards.first().ok_or(EngineError::EmptySelection)?;
    if !is_valid_card_sequence(cards) {
        return Err(EngineError::InvalidSequence);
    }

    // 2. Source pile
    let source_id = from.pile();
    let source = state
        .pile(source_id)
        .ok_or(EngineError::PileOutOfRange(source_id))?;

    // 3. The cards must be the tail of the source pile
    if from.card_index >= source.len() {
        return Err(EngineError::CardIndexOutOfRange(from));
    }
    let tail_len = source.len() - from.card_index;
    if tail_len != cards.len()
        || !source
            .iter()
            .skip(from.card_index)
            .zip(cards)
            .all(|(on_pile, moving)| on_pile.same_card(moving))
    {
        return Err(EngineError::NotEndOfPile);
    }
    if source.iter().skip(from.card_index).any(|c| !c.face_up) {
        return Err(EngineError::FaceDownCard);
    }
    if matches!(from.kind, PileKind::Waste | PileKind::Foundation) && cards.len() > 1 {
        return Err(EngineError::SingleCardOnly(from.kind));
    }

    // 4. Destination
    let destination = match to.kind {
        PileKind::Tableau => {
            let id = PileId::tableau(to.pile_index);
            let pile = state.pile(id).ok_or(EngineError::PileOutOfRange(id))?;
            if id == source_id {
                return Err(EngineError::SamePile);
            }
            if !can_place_on_tableau(first, pile) {
                return Err(EngineError::IllegalTableauPlacement {
                    card: first.to_string(),
                    pile: id.index,
                });
            }
            id
        }
        PileKind::Foundation => {
            if cards.len() > 1 {
                return Err(EngineError::FoundationTakesOneCard);
            }
            let index = find_valid_foundation_pile(first, state)
                .ok_or_else(|| EngineError::NoFoundationTarget(first.to_string()))?;
            let id = PileId::foundation(index);
            if id == source_id {
                return Err(EngineError::SamePile);
            }
            id
        }
        kind => return Err(EngineError::InvalidDestination(kind)),
    };

    Ok(ValidatedMove {
        source: source_id,
        destination,
        cards: source.iter().skip(from.card_index).copied().collect(),
    })
}

/// Validate and execute a move, producing the next state.
pub fn attempt(state: &GameState, from: CardPosition, to: CardPosition, cards: &[Card]) -> MoveResult {
    let validated = validate_move(state, from, to, cards)?;
    execute(state, &validated)
}

/// Execute an already validated move on a copy of `state`.
///
/// Inconsistencies between `validated` and `state` are reported as
/// execution errors; `state` itself is never modified.
pub fn execute(state: &GameState, validated: &ValidatedMove) -> MoveResult {
    let mut next = state.clone();
    let count = validated.count();

    let source = next.pile_mut(validated.source).ok_or_else(|| {
        EngineError::Execution(format!("source {} vanished", validated.source))
    })?;
    let split_at = source.len().checked_sub(count).ok_or_else(|| {
        EngineError::Execution(format!("source {} has fewer than {count} cards", validated.source))
    })?;
    let moved = source.split_off(split_at);

    // Reveal the card left on top of a tableau pile
    if validated.source.kind == PileKind::Tableau {
        if let Some(top) = source.back_mut() {
            if !top.face_up {
                top.face_up = true;
                top.draggable = true;
            }
        }
    }

    let destination = next.pile_mut(validated.destination).ok_or_else(|| {
        EngineError::Execution(format!("destination {} vanished", validated.destination))
    })?;
    destination.extend(moved.into_iter().map(|card| Card {
        face_up: true,
        draggable: false,
        ..card
    }));

    next.moves += 1;
    next.score += calculate_score_for_move(validated.source.kind, validated.destination.kind, count);
    next.is_won = check_win_condition(&next);
    update_draggable_states(&mut next);
    next.selection = None;

    debug!(
        source = %validated.source,
        destination = %validated.destination,
        count,
        score = next.score,
        "move executed"
    );

    Ok(next)
}

/// Every destination `card` could legally land on.
///
/// Lists each accepting tableau pile (other than the card's own) plus the
/// suit-correct foundation when it accepts the card.
#[must_use]
pub fn find_valid_moves(state: &GameState, card: &Card) -> Vec<CardPosition> {
    let current = state.find_card(card.id).map(|(pos, _)| pos.pile());

    let mut targets: Vec<CardPosition> = state
        .tableau
        .iter()
        .enumerate()
        .filter(|&(i, _)| current != Some(PileId::tableau(i)))
        .filter(|(_, pile)| can_place_on_tableau(card, pile))
        .map(|(i, pile)| CardPosition::tableau(i, pile.len()))
        .collect();

    if let Some(index) = find_valid_foundation_pile(card, state) {
        targets.push(CardPosition::foundation(index, state.foundations[index].len()));
    }

    targets
}

/// The foundation slot `card` should auto-move to, if auto-move is enabled
/// and the placement is legal.
#[must_use]
pub fn find_auto_move_target(state: &GameState, card: &Card) -> Option<CardPosition> {
    if !state.settings.auto_move_to_foundation {
        return None;
    }
    find_valid_foundation_pile(card, state)
        .map(|index| CardPosition::foundation(index, state.foundations[index].len()))
}
