//! Action orchestration: validate, commit, notify.
//!
//! Operations are associated functions on `ActionOrchestrator` that take an
//! `ActionContext` borrowing the state manager and the event bus. Nothing
//! is emitted before the commit, and a rejected action commits nothing.
//!
//! ## Event order
//!
//! | Action     | Events                                                        |
//! |------------|---------------------------------------------------------------|
//! | move       | `GameStarted`?, `MoveExecuted`, `GameWon`?, `StateChanged`    |
//! | stock flip | `StockFlipped`, `StateChanged`                                |
//! | new game   | `NewGameStarted`, `StateChanged`                              |
//! | undo/redo  | `UndoExecuted`/`RedoExecuted`, `StateChanged`                 |
//! | select     | `CardSelected`, `StateChanged`                                |
//! | rejected   | `InvalidMove` (moves and stock flips only)                    |

use tracing::{debug, warn};

use crate::core::{
    now_millis, Card, CardId, CardPosition, EngineError, GameRng, GameSettings, GameState,
    PileKind, Selection, SettingsPatch,
};
use crate::deal::deal;
use crate::events::{EventBus, FlipAction, GameEvent};
use crate::history::StateManager;
use crate::rules::{
    self, execute, find_auto_move_target, movable_cards_at, validate_move, MoveResult,
};

/// What the orchestrator needs to run an action.
pub struct ActionContext<'a> {
    /// Owner of the committed state and its history.
    pub state: &'a mut StateManager,
    /// Where notifications go after a commit.
    pub events: &'a EventBus,
}

impl<'a> ActionContext<'a> {
    pub fn new(state: &'a mut StateManager, events: &'a EventBus) -> Self {
        Self { state, events }
    }

    fn emit(&self, event: GameEvent) {
        let failures = self.events.emit(&event);
        if failures > 0 {
            debug!(kind = ?event.kind, failures, "listeners failed");
        }
    }

    /// Log a rejected action, tell subscribers, hand the error back.
    fn reject(&self, action: &str, error: EngineError) -> EngineError {
        warn!(action, reason = error.reason(), %error, "action rejected");
        self.emit(GameEvent::invalid_move(error.clone()));
        error
    }
}

/// What a click on a card did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivateOutcome {
    /// The card went straight to its foundation.
    Moved(GameState),
    /// The movable run starting at the card was selected.
    Selected(Vec<Card>),
    /// The stock was flipped or recycled.
    Flipped(GameState),
}

/// Runs player actions against the committed state.
pub struct ActionOrchestrator;

impl ActionOrchestrator {
    // === Moves ===

    /// Move `cards` from `from` to `to`.
    pub fn move_cards(
        ctx: &mut ActionContext<'_>,
        from: CardPosition,
        to: CardPosition,
        cards: &[Card],
    ) -> MoveResult {
        let current = ctx.state.peek();
        let outcome = validate_move(current, from, to, cards)
            .and_then(|validated| execute(current, &validated).map(|next| (validated, next)));
        let (validated, next) = match outcome {
            Ok(done) => done,
            Err(error) => return Err(ctx.reject("move", error)),
        };

        let first_move = current.moves == 0;
        let newly_won = next.is_won && !current.is_won;
        let score_delta = next.score - current.score;
        let label = format!(
            "Move {} card(s) from {} to {}",
            validated.count(),
            validated.source,
            validated.destination
        );

        ctx.state.set_state(next.clone(), &label);

        if first_move {
            ctx.emit(GameEvent::game_started());
        }
        ctx.emit(GameEvent::move_executed(
            validated.source,
            validated.destination,
            validated.cards.to_vec(),
            score_delta,
        ));
        if newly_won {
            debug!(score = next.score, moves = next.moves, "game won");
            ctx.emit(GameEvent::game_won(next.score, next.moves));
        }
        ctx.emit(GameEvent::state_changed(label));

        Ok(next)
    }

    /// Send a card to its foundation in one action.
    ///
    /// Only a face-up card on top of its pile qualifies, and only while
    /// `auto_move_to_foundation` is on. When there is no target the call
    /// fails without committing or emitting anything.
    pub fn auto_move(ctx: &mut ActionContext<'_>, card_id: CardId) -> MoveResult {
        let state = ctx.state.peek();
        let (position, card) = state
            .find_card(card_id)
            .ok_or(EngineError::CardNotFound(card_id))?;

        let on_top = state
            .pile(position.pile())
            .is_some_and(|pile| pile.len() == position.card_index + 1);
        if !card.face_up || !on_top {
            return Err(EngineError::NoAutoMoveTarget);
        }
        let target = find_auto_move_target(state, &card).ok_or(EngineError::NoAutoMoveTarget)?;

        Self::move_cards(ctx, position, target, &[card])
    }

    /// Move the current selection to `to`.
    pub fn move_selection(ctx: &mut ActionContext<'_>, to: CardPosition) -> MoveResult {
        let Selection { cards, source } = ctx
            .state
            .peek()
            .selection
            .clone()
            .ok_or(EngineError::EmptySelection)?;
        Self::move_cards(ctx, source, to, &cards)
    }

    // === Stock ===

    /// Draw from the stock, or recycle the waste when the stock is empty.
    pub fn flip_stock(ctx: &mut ActionContext<'_>) -> MoveResult {
        let flip = match rules::flip_stock(ctx.state.peek()) {
            Ok(flip) => flip,
            Err(error) => return Err(ctx.reject("flip stock", error)),
        };

        let label = match flip.action {
            FlipAction::Flip => "Flip stock",
            FlipAction::Recycle => "Recycle stock",
        };
        ctx.state.set_state(flip.state.clone(), label);

        ctx.emit(GameEvent::stock_flipped(flip.action, flip.count));
        ctx.emit(GameEvent::state_changed(label));

        Ok(flip.state)
    }

    // === Game lifecycle ===

    /// Deal a new game with the current settings.
    ///
    /// A missing seed is drawn from the thread RNG. History is cleared: the
    /// new deal cannot be undone.
    pub fn new_game(ctx: &mut ActionContext<'_>, seed: Option<u64>) -> GameState {
        let seed = seed.unwrap_or_else(GameRng::random_seed);
        let settings = ctx.state.peek().settings.clone();

        let mut state = deal(seed, settings);
        state.started_at = now_millis();
        ctx.state.reset(state.clone());
        debug!(seed, "new game dealt");

        ctx.emit(GameEvent::new_game_started(seed));
        ctx.emit(GameEvent::state_changed("New game"));

        state
    }

    /// Step back one action. Returns `false` when there is nothing to undo.
    pub fn undo(ctx: &mut ActionContext<'_>) -> bool {
        let Some(label) = ctx.state.history().next_undo().map(|e| e.label.clone()) else {
            return false;
        };
        if ctx.state.undo().is_none() {
            return false;
        }
        ctx.state.update_transient(|state| state.selection = None);

        ctx.emit(GameEvent::undo_executed(label.clone()));
        ctx.emit(GameEvent::state_changed(format!("Undo: {label}")));
        true
    }

    /// Re-apply the last undone action. Returns `false` when there is none.
    pub fn redo(ctx: &mut ActionContext<'_>) -> bool {
        let Some(label) = ctx.state.history().next_redo().map(|e| e.label.clone()) else {
            return false;
        };
        if ctx.state.redo().is_none() {
            return false;
        }
        ctx.state.update_transient(|state| state.selection = None);

        ctx.emit(GameEvent::redo_executed(label.clone()));
        ctx.emit(GameEvent::state_changed(format!("Redo: {label}")));
        true
    }

    /// Merge `patch` into the current settings and commit the result.
    pub fn update_settings(
        ctx: &mut ActionContext<'_>,
        patch: &SettingsPatch,
    ) -> Result<GameSettings, EngineError> {
        let settings = patch.apply(&ctx.state.peek().settings).map_err(|error| {
            warn!(%error, "settings update rejected");
            error
        })?;

        let applied = settings.clone();
        ctx.state.update_state(
            move |mut state| {
                state.settings = settings;
                state
            },
            "Update settings",
        );
        ctx.emit(GameEvent::state_changed("Update settings"));

        Ok(applied)
    }

    // === Selection ===

    /// Pick up the movable run at `position`.
    ///
    /// The selection is transient: it is not recorded in history.
    pub fn select(
        ctx: &mut ActionContext<'_>,
        position: CardPosition,
    ) -> Result<Vec<Card>, EngineError> {
        let pile = position.pile();
        if ctx.state.peek().pile(pile).is_none() {
            return Err(EngineError::PileOutOfRange(pile));
        }
        let cards = movable_cards_at(ctx.state.peek(), position);
        if cards.is_empty() {
            return Err(EngineError::NotMovable(position));
        }

        let selection = Selection {
            cards: cards.clone(),
            source: position,
        };
        ctx.state.update_transient(|state| state.selection = Some(selection));

        ctx.emit(GameEvent::card_selected(position, cards.clone()));
        ctx.emit(GameEvent::state_changed("Select"));
        Ok(cards)
    }

    /// Drop the current selection. Returns `false` if nothing was selected.
    pub fn deselect(ctx: &mut ActionContext<'_>) -> bool {
        if ctx.state.peek().selection.is_none() {
            return false;
        }
        ctx.state.update_transient(|state| state.selection = None);
        ctx.emit(GameEvent::state_changed("Deselect"));
        true
    }

    /// Handle a click on `position`.
    ///
    /// The stock flips. A face-up top card with a foundation target is
    /// auto-moved; anything else falls back to selecting the run there.
    pub fn activate(
        ctx: &mut ActionContext<'_>,
        position: CardPosition,
    ) -> Result<ActivateOutcome, EngineError> {
        if position.kind == PileKind::Stock {
            return Self::flip_stock(ctx).map(ActivateOutcome::Flipped);
        }

        let state = ctx.state.peek();
        let card = *state
            .card_at(position)
            .ok_or(EngineError::CardIndexOutOfRange(position))?;
        let on_top = state
            .pile(position.pile())
            .is_some_and(|pile| pile.len() == position.card_index + 1);

        if on_top && card.face_up && find_auto_move_target(state, &card).is_some() {
            return Self::auto_move(ctx, card.id).map(ActivateOutcome::Moved);
        }
        Self::select(ctx, position).map(ActivateOutcome::Selected)
    }
}
