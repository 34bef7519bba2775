//! Stock flips and waste recycling.

use tracing::debug;

use super::predicates::update_draggable_states;
use crate::core::{Card, EngineError, GameState};
use crate::events::FlipAction;

/// Result of a legal stock action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockFlip {
    pub state: GameState,
    pub action: FlipAction,
    /// Cards drawn, or cards returned to the stock on recycle.
    pub count: usize,
}

/// Flip up to `draw_count` cards from stock to waste, or recycle the waste
/// when the stock is empty.
///
/// Cards are drawn one at a time from the stock's top onto the waste's top,
/// so recycling (the waste reversed) restores the original stock order.
pub fn flip_stock(state: &GameState) -> Result<StockFlip, EngineError> {
    let mut next = state.clone();

    let (action, count) = if next.stock.is_empty() {
        if next.waste.is_empty() {
            return Err(EngineError::StockEmpty);
        }
        if !next.settings.allows_recycle(next.stock_cycles) {
            return Err(EngineError::CyclingLimitReached(next.settings.deck_cycling_limit));
        }

        let count = next.waste.len();
        next.stock = next
            .waste
            .iter()
            .rev()
            .map(|card| Card {
                face_up: false,
                draggable: false,
                ..*card
            })
            .collect();
        next.waste.clear();
        next.stock_cycles += 1;
        (FlipAction::Recycle, count)
    } else {
        let draw = usize::from(next.settings.draw_count.max(1)).min(next.stock.len());
        for _ in 0..draw {
            if let Some(card) = next.stock.pop_back() {
                next.waste.push_back(Card {
                    face_up: true,
                    draggable: true,
                    ..card
                });
            }
        }
        (FlipAction::Flip, draw)
    };

    update_draggable_states(&mut next);
    next.selection = None;

    debug!(?action, count, cycles = next.stock_cycles, "stock flipped");
    Ok(StockFlip { state: next, action, count })
}
