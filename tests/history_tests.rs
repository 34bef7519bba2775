//! Undo/redo and event-ordering integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use klondike_engine::{
    listener, Card, CardPosition, EngineConfig, EventKind, EventPayload, GameState,
    KlondikeEngine, ListenerError, SettingsPatch, Suit,
};

fn up(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank).face_up()
}

/// Play the engine's own hints (or flip) for up to `steps` actions.
fn play_hints(engine: &mut KlondikeEngine, steps: usize) -> Vec<GameState> {
    let mut seen = vec![engine.current_state()];
    for _ in 0..steps {
        let played = match engine.hint() {
            Some(hint) => engine.move_cards(hint.from, hint.to, &hint.cards).is_ok(),
            None => engine.flip_stock().is_ok(),
        };
        if !played {
            break;
        }
        seen.push(engine.current_state());
    }
    seen
}

// =============================================================================
// Undo / Redo
// =============================================================================

/// Undo walks back through every committed state, redo walks forward again.
#[test]
fn test_undo_inverts_every_action() {
    let mut engine = KlondikeEngine::with_seed(EngineConfig::default(), 2024).unwrap();
    let states = play_hints(&mut engine, 30);
    assert!(states.len() > 1);

    for expected in states.iter().rev().skip(1) {
        assert!(engine.undo());
        let current = engine.current_state();
        assert!(current.same_position(expected));
        assert_eq!(current.moves, expected.moves);
        assert_eq!(current.score, expected.score);
    }
    assert!(!engine.undo());

    for expected in states.iter().skip(1) {
        assert!(engine.redo());
        assert!(engine.current_state().same_position(expected));
    }
    assert!(!engine.redo());
}

/// A new action after undo discards the redo branch.
#[test]
fn test_new_action_discards_redo() {
    let state = GameState::default()
        .with_stock([Card::new(Suit::Clubs, 2), Card::new(Suit::Clubs, 3)]);
    let mut engine = KlondikeEngine::from_state(state, EngineConfig::default()).unwrap();

    engine.flip_stock().unwrap();
    engine.flip_stock().unwrap();
    assert!(engine.undo());
    assert!(engine.can_redo());

    engine
        .update_settings(&SettingsPatch::new().sound_enabled(false))
        .unwrap();
    assert!(!engine.can_redo());
    assert_eq!(
        engine.history().undo_labels().collect::<Vec<_>>(),
        vec!["Flip stock", "Update settings"]
    );
}

/// The history never grows past its bound and undo stays in range.
#[test]
fn test_history_bound() {
    let config = EngineConfig::default().with_max_history(5);
    let mut engine = KlondikeEngine::with_seed(config, 77).unwrap();
    for _ in 0..20 {
        engine.flip_stock().unwrap();
    }
    assert_eq!(engine.history().len(), 5);

    let mut undone = 0;
    while engine.undo() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert_eq!(engine.current_state().stock.len(), 24 - 15);
}

/// Settings changes are undoable like any other action.
#[test]
fn test_undo_settings_change() {
    let mut engine = KlondikeEngine::with_seed(EngineConfig::default(), 5).unwrap();
    engine.update_settings(&SettingsPatch::new().draw_count(3)).unwrap();
    assert_eq!(engine.settings().draw_count, 3);

    assert!(engine.undo());
    assert_eq!(engine.settings().draw_count, 1);
}

// =============================================================================
// Event Ordering
// =============================================================================

/// Events for a full action arrive in commit order, after the commit.
#[test]
fn test_events_observe_committed_state() {
    let state = GameState::default()
        .with_tableau(0, [up(Suit::Spades, 7)])
        .with_waste([up(Suit::Hearts, 6)]);
    let mut engine = KlondikeEngine::from_state(state, EngineConfig::default()).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let record = listener(move |event| {
        sink.borrow_mut().push(event.kind);
        Ok(())
    });
    for kind in EventKind::ALL {
        engine.subscribe(kind, record.clone());
    }

    engine
        .move_cards(CardPosition::waste(0), CardPosition::tableau(0, 1), &[up(Suit::Hearts, 6)])
        .unwrap();
    engine.undo();
    engine.redo();
    engine.new_game(Some(1));

    assert_eq!(
        *log.borrow(),
        vec![
            EventKind::GameStarted,
            EventKind::MoveExecuted,
            EventKind::StateChanged,
            EventKind::UndoExecuted,
            EventKind::StateChanged,
            EventKind::RedoExecuted,
            EventKind::StateChanged,
            EventKind::NewGameStarted,
            EventKind::StateChanged,
        ]
    );
}

/// Undo events carry the label of the action undone.
#[test]
fn test_undo_event_label() {
    let state = GameState::default().with_stock([Card::new(Suit::Clubs, 2)]);
    let mut engine = KlondikeEngine::from_state(state, EngineConfig::default()).unwrap();

    let labels = Rc::new(RefCell::new(Vec::new()));
    let sink = labels.clone();
    engine.subscribe(
        EventKind::UndoExecuted,
        listener(move |event| {
            if let EventPayload::Label(label) = &event.payload {
                sink.borrow_mut().push(label.clone());
            }
            Ok(())
        }),
    );

    engine.flip_stock().unwrap();
    engine.undo();
    assert_eq!(*labels.borrow(), vec!["Flip stock".to_owned()]);
}

/// A failing or panicking listener does not stop the others or the engine.
#[test]
fn test_listener_failures_are_isolated() {
    let state = GameState::default().with_stock([Card::new(Suit::Clubs, 2)]);
    let mut engine = KlondikeEngine::from_state(state, EngineConfig::default()).unwrap();

    let delivered = Rc::new(RefCell::new(0));
    let counter = delivered.clone();
    engine.subscribe(
        EventKind::StockFlipped,
        listener(|_| Err(ListenerError::new("display offline"))),
    );
    engine.subscribe(EventKind::StockFlipped, listener(|_| panic!("listener bug")));
    engine.subscribe(
        EventKind::StockFlipped,
        listener(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }),
    );

    let next = engine.flip_stock().unwrap();
    assert_eq!(next.waste.len(), 1);
    assert_eq!(*delivered.borrow(), 1);
    assert_eq!(engine.current_state().waste.len(), 1);
}
