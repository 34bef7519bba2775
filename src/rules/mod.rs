//! Klondike rules.
//!
//! - `predicates`: pure legality and scoring checks
//! - `validator`: move validation and the state transition function
//! - `stock`: stock flips and waste recycling
//! - `hints`: first productive move search
//!
//! No module here holds state; each operates on the `GameState` it is given.

pub mod hints;
pub mod predicates;
pub mod stock;
pub mod validator;

pub use hints::{find_hint, Hint};

pub use predicates::{
    calculate_score_for_move, can_place_on_foundation, can_place_on_tableau,
    check_win_condition, find_valid_foundation_pile, foundation_index_for_suit,
    is_valid_card_sequence, movable_cards_at, movable_cards_from_tableau, update_draggable_states,
};
pub use stock::{flip_stock, StockFlip};
pub use validator::{
    attempt, execute, find_auto_move_target, find_valid_moves, validate_move, MoveResult,
    ValidatedMove,
};
