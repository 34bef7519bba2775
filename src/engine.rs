//! The engine facade.
//!
//! `KlondikeEngine` is the composition root: it owns the state manager
//! (and with it the history), the event bus and the configuration, and
//! routes every player action through `ActionOrchestrator`. Read accessors
//! hand out copies or shared borrows; nothing outside the engine can
//! mutate the committed state.
//!
//! ```
//! use klondike_engine::{EngineConfig, KlondikeEngine};
//!
//! let mut engine = KlondikeEngine::with_seed(EngineConfig::default(), 7).unwrap();
//! let dealt = engine.current_state();
//! assert_eq!(dealt.stock.len(), 24);
//!
//! engine.flip_stock().unwrap();
//! assert_eq!(engine.current_state().waste.len(), 1);
//! assert!(engine.undo());
//! assert!(engine.current_state().same_position(&dealt));
//! ```

use tracing::debug;

use crate::actions::{ActionContext, ActionOrchestrator, ActivateOutcome};
use crate::core::{
    now_millis, Card, CardId, CardPosition, EngineConfig, EngineError, GameRng, GameSettings,
    GameState, SettingsPatch,
};
use crate::deal::deal;
use crate::events::{EventBus, EventKind, Listener};
use crate::history::{HistoryStore, StateManager};
use crate::rules::{
    find_hint, find_valid_moves, movable_cards_at, update_draggable_states, validate_move, Hint,
    MoveResult,
};

/// A single game of Klondike with undo history and event notifications.
#[derive(Debug)]
pub struct KlondikeEngine {
    manager: StateManager,
    events: EventBus,
    config: EngineConfig,
}

impl KlondikeEngine {
    // === Construction ===

    /// Create an engine with a freshly dealt, randomly seeded game.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_seed(config, GameRng::random_seed())
    }

    /// Create an engine whose first deal uses `seed`.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        config.settings.validate()?;
        let mut state = deal(seed, config.settings.clone());
        state.started_at = now_millis();
        Ok(Self::assemble(state, config))
    }

    /// Resume a previously saved game.
    ///
    /// The state's own settings are kept; `config.settings` is ignored.
    /// Draggable flags are recomputed and any selection is dropped. A board
    /// with malformed or duplicated cards is rejected.
    pub fn from_state(mut state: GameState, config: EngineConfig) -> Result<Self, EngineError> {
        state.validate()?;
        state.selection = None;
        update_draggable_states(&mut state);
        Ok(Self::assemble(state, config))
    }

    fn assemble(state: GameState, config: EngineConfig) -> Self {
        debug!(seed = state.seed, max_history = config.max_history, "engine created");
        Self {
            manager: StateManager::new(state, config.max_history),
            events: EventBus::new(),
            config,
        }
    }

    fn ctx(&mut self) -> ActionContext<'_> {
        ActionContext::new(&mut self.manager, &self.events)
    }

    // === Actions ===

    /// Move `cards` from `from` to `to`.
    pub fn move_cards(&mut self, from: CardPosition, to: CardPosition, cards: &[Card]) -> MoveResult {
        ActionOrchestrator::move_cards(&mut self.ctx(), from, to, cards)
    }

    /// Flip the stock, or recycle the waste when the stock is empty.
    pub fn flip_stock(&mut self) -> MoveResult {
        ActionOrchestrator::flip_stock(&mut self.ctx())
    }

    /// Deal a new game, keeping the current settings.
    pub fn new_game(&mut self, seed: Option<u64>) -> GameState {
        ActionOrchestrator::new_game(&mut self.ctx(), seed)
    }

    pub fn undo(&mut self) -> bool {
        ActionOrchestrator::undo(&mut self.ctx())
    }

    pub fn redo(&mut self) -> bool {
        ActionOrchestrator::redo(&mut self.ctx())
    }

    /// Send a card to its foundation, if it can go there right now.
    pub fn auto_move(&mut self, card_id: CardId) -> MoveResult {
        ActionOrchestrator::auto_move(&mut self.ctx(), card_id)
    }

    pub fn select(&mut self, position: CardPosition) -> Result<Vec<Card>, EngineError> {
        ActionOrchestrator::select(&mut self.ctx(), position)
    }

    pub fn deselect(&mut self) -> bool {
        ActionOrchestrator::deselect(&mut self.ctx())
    }

    /// Move the selected cards to `to`.
    pub fn move_selection(&mut self, to: CardPosition) -> MoveResult {
        ActionOrchestrator::move_selection(&mut self.ctx(), to)
    }

    /// Handle a click on `position`.
    pub fn activate(&mut self, position: CardPosition) -> Result<ActivateOutcome, EngineError> {
        ActionOrchestrator::activate(&mut self.ctx(), position)
    }

    /// Merge `patch` into the current settings.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<GameSettings, EngineError> {
        ActionOrchestrator::update_settings(&mut self.ctx(), patch)
    }

    // === Subscriptions ===

    pub fn subscribe(&mut self, kind: EventKind, listener: Listener) {
        self.events.subscribe(kind, listener);
    }

    pub fn unsubscribe(&mut self, kind: EventKind, listener: &Listener) {
        self.events.unsubscribe(kind, listener);
    }

    // === Queries ===

    /// A copy of the committed state.
    #[must_use]
    pub fn current_state(&self) -> GameState {
        self.manager.state()
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.manager.peek().settings
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Look a card up anywhere on the board.
    #[must_use]
    pub fn card_by_id(&self, id: CardId) -> Option<Card> {
        self.manager.peek().find_card(id).map(|(_, card)| card)
    }

    /// The cards that would be picked up at `position`.
    #[must_use]
    pub fn movable_cards_for_position(&self, position: CardPosition) -> Vec<Card> {
        movable_cards_at(self.manager.peek(), position)
    }

    /// Would this move be accepted? Nothing is committed or emitted.
    #[must_use]
    pub fn can_drop_at_position(&self, from: CardPosition, to: CardPosition, cards: &[Card]) -> bool {
        validate_move(self.manager.peek(), from, to, cards).is_ok()
    }

    /// Every position the card could legally land on.
    #[must_use]
    pub fn valid_targets(&self, id: CardId) -> Vec<CardPosition> {
        let state = self.manager.peek();
        state
            .find_card(id)
            .filter(|(_, card)| card.face_up)
            .map(|(_, card)| find_valid_moves(state, &card))
            .unwrap_or_default()
    }

    /// A productive move, if there is one.
    #[must_use]
    pub fn hint(&self) -> Option<Hint> {
        find_hint(self.manager.peek())
    }

    // === History ===

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.manager.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.manager.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        self.manager.history()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::{ErrorKind, PileKind, Suit};
    use crate::events::{listener, GameEvent};

    fn up(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).face_up()
    }

    fn engine_with(state: GameState) -> KlondikeEngine {
        KlondikeEngine::from_state(state, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_seeded_engines_agree() {
        let a = KlondikeEngine::with_seed(EngineConfig::default(), 99).unwrap();
        let b = KlondikeEngine::with_seed(EngineConfig::default(), 99).unwrap();
        assert!(a.current_state().same_position(&b.current_state()));
        assert_eq!(a.current_state().seed, 99);
        assert!(!a.can_undo());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default()
            .with_settings(GameSettings::default().with_draw_count(0));
        let err = KlondikeEngine::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_from_state_rejects_duplicate_cards() {
        let king = up(Suit::Spades, 13);
        let state = GameState::default()
            .with_tableau(0, [king])
            .with_tableau(1, [king]);

        let err = KlondikeEngine::from_state(state, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::CorruptState(_)));
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_from_state_recomputes_flags() {
        let mut state = GameState::default().with_tableau(0, [up(Suit::Spades, 7)]);
        state.selection = Some(crate::core::Selection {
            cards: vec![up(Suit::Spades, 7)],
            source: CardPosition::tableau(0, 0),
        });
        let engine = engine_with(state);
        let current = engine.current_state();
        assert!(current.tableau[0][0].draggable);
        assert_eq!(current.selection, None);
    }

    #[test]
    fn test_current_state_is_a_copy() {
        let engine = engine_with(GameState::default().with_waste([up(Suit::Hearts, 3)]));
        let mut copy = engine.current_state();
        copy.waste.clear();
        assert_eq!(engine.current_state().waste.len(), 1);
    }

    #[test]
    fn test_card_by_id() {
        let engine = KlondikeEngine::with_seed(EngineConfig::default(), 5).unwrap();
        for suit in Suit::ALL {
            for rank in 1..=13 {
                let id = CardId::from_suit_rank(suit, rank);
                let card = engine.card_by_id(id).unwrap();
                assert_eq!((card.suit, card.rank), (suit, rank));
            }
        }
    }

    #[test]
    fn test_can_drop_is_a_dry_run() {
        let state = GameState::default()
            .with_tableau(0, [up(Suit::Spades, 7)])
            .with_waste([up(Suit::Hearts, 6)]);
        let mut engine = engine_with(state);
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        let on_any = listener(move |_: &GameEvent| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        for kind in EventKind::ALL {
            engine.subscribe(kind, on_any.clone());
        }

        let six = [up(Suit::Hearts, 6)];
        assert!(engine.can_drop_at_position(CardPosition::waste(0), CardPosition::tableau(0, 1), &six));
        assert!(!engine.can_drop_at_position(CardPosition::waste(0), CardPosition::tableau(1, 0), &six));
        assert_eq!(*seen.borrow(), 0);
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_movable_cards_and_targets() {
        let state = GameState::default()
            .with_tableau(0, [Card::new(Suit::Clubs, 2), up(Suit::Hearts, 9), up(Suit::Spades, 8)])
            .with_tableau(1, [up(Suit::Clubs, 10)])
            .with_tableau(2, [up(Suit::Diamonds, 10)]);
        let engine = engine_with(state);

        assert_eq!(engine.movable_cards_for_position(CardPosition::tableau(0, 1)).len(), 2);
        assert!(engine.movable_cards_for_position(CardPosition::tableau(0, 0)).is_empty());

        let nine = CardId::from_suit_rank(Suit::Hearts, 9);
        let targets = engine.valid_targets(nine);
        assert_eq!(targets, vec![CardPosition::tableau(1, 1)]);
        assert!(engine.valid_targets(CardId::from_suit_rank(Suit::Clubs, 2)).is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut engine = engine_with(GameState::default().with_stock([Card::new(Suit::Clubs, 4)]));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let on_flip = listener(move |event: &GameEvent| {
            sink.borrow_mut().push(event.kind);
            Ok(())
        });

        engine.subscribe(EventKind::StockFlipped, on_flip.clone());
        engine.flip_stock().unwrap();
        engine.unsubscribe(EventKind::StockFlipped, &on_flip);
        engine.flip_stock().unwrap();

        assert_eq!(*seen.borrow(), vec![EventKind::StockFlipped]);
    }

    #[test]
    fn test_hint_points_at_foundation() {
        let engine = engine_with(GameState::default().with_tableau(4, [up(Suit::Spades, 1)]));
        let hint = engine.hint().unwrap();
        assert_eq!(hint.from, CardPosition::tableau(4, 0));
        assert_eq!(hint.to.kind, PileKind::Foundation);
    }

    #[test]
    fn test_history_bound_from_config() {
        let state = GameState::default().with_stock((1..=5).map(|r| Card::new(Suit::Clubs, r)));
        let mut engine =
            KlondikeEngine::from_state(state, EngineConfig::default().with_max_history(2)).unwrap();
        for _ in 0..5 {
            engine.flip_stock().unwrap();
        }
        assert_eq!(engine.history().len(), 2);
        assert!(engine.undo());
        assert!(engine.undo());
        assert!(!engine.undo());
    }
}
