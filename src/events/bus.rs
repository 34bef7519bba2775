//! Typed publish/subscribe.
//!
//! The bus maps each `EventKind` to an ordered list of listeners. A
//! listener's identity is its `Rc` allocation, which makes subscribing
//! twice and unsubscribing a stranger both no-ops.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use klondike_engine::events::{listener, EventBus, EventKind, GameEvent};
//!
//! let mut bus = EventBus::new();
//! let seen = Rc::new(Cell::new(0));
//! let counter = seen.clone();
//! let on_change = listener(move |_| {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//!
//! bus.subscribe(EventKind::StateChanged, on_change.clone());
//! bus.subscribe(EventKind::StateChanged, on_change.clone()); // no-op
//! bus.emit(&GameEvent::state_changed("test"));
//! assert_eq!(seen.get(), 1);
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::error;

use super::event::{EventKind, GameEvent};
use crate::core::ListenerError;

/// A subscriber callback.
pub type Listener = Rc<dyn Fn(&GameEvent) -> Result<(), ListenerError>>;

/// Wrap a closure as a `Listener`.
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&GameEvent) -> Result<(), ListenerError> + 'static,
{
    Rc::new(f)
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

/// Event bus with per-listener failure isolation.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: FxHashMap<EventKind, Vec<Listener>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: FxHashMap<EventKind, usize> =
            self.listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener for `kind`. Already subscribed listeners are ignored.
    pub fn subscribe(&mut self, kind: EventKind, listener: Listener) {
        let list = self.listeners.entry(kind).or_default();
        if !list.iter().any(|l| same_listener(l, &listener)) {
            list.push(listener);
        }
    }

    /// Remove a listener for `kind`. Unknown listeners are ignored.
    pub fn unsubscribe(&mut self, kind: EventKind, listener: &Listener) {
        if let Some(list) = self.listeners.get_mut(&kind) {
            list.retain(|l| !same_listener(l, listener));
        }
    }

    /// Number of listeners for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver `event` to every listener of its kind, in subscription order.
    ///
    /// A listener that returns an error or panics is logged and skipped;
    /// the rest still receive the event. Returns how many listeners failed.
    pub fn emit(&self, event: &GameEvent) -> usize {
        let Some(list) = self.listeners.get(&event.kind) else {
            return 0;
        };

        let mut failures = 0;
        for (index, listener) in list.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failures += 1;
                    error!(kind = ?event.kind, index, %err, "event listener failed");
                }
                Err(_) => {
                    failures += 1;
                    error!(kind = ?event.kind, index, "event listener panicked");
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::events::EventPayload;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Listener {
        let log = log.clone();
        listener(move |_| {
            log.borrow_mut().push(name);
            Ok(())
        })
    }

    #[test]
    fn test_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::MoveExecuted, recorder(&log, "a"));
        bus.subscribe(EventKind::MoveExecuted, recorder(&log, "b"));
        bus.subscribe(EventKind::MoveExecuted, recorder(&log, "c"));

        bus.emit(&GameEvent::new(EventKind::MoveExecuted, EventPayload::None));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_only_matching_kind_receives() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::GameWon, recorder(&log, "won"));

        bus.emit(&GameEvent::state_changed("x"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let l = recorder(&log, "once");
        bus.subscribe(EventKind::StateChanged, l.clone());
        bus.subscribe(EventKind::StateChanged, l.clone());
        assert_eq!(bus.listener_count(EventKind::StateChanged), 1);

        bus.emit(&GameEvent::state_changed("x"));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        bus.subscribe(EventKind::StateChanged, a.clone());

        // Never registered: no-op
        bus.unsubscribe(EventKind::StateChanged, &b);
        bus.unsubscribe(EventKind::GameWon, &a);
        assert_eq!(bus.listener_count(EventKind::StateChanged), 1);

        bus.unsubscribe(EventKind::StateChanged, &a);
        bus.unsubscribe(EventKind::StateChanged, &a);
        assert_eq!(bus.listener_count(EventKind::StateChanged), 0);

        bus.emit(&GameEvent::state_changed("x"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::StateChanged, recorder(&log, "first"));
        bus.subscribe(
            EventKind::StateChanged,
            listener(|_| Err(ListenerError::new("disk full"))),
        );
        bus.subscribe(EventKind::StateChanged, listener(|_| panic!("listener bug")));
        bus.subscribe(EventKind::StateChanged, recorder(&log, "last"));

        let failures = bus.emit(&GameEvent::state_changed("x"));
        assert_eq!(failures, 2);
        assert_eq!(*log.borrow(), vec!["first", "last"]);
    }

    #[test]
    fn test_emit_without_listeners() {
        let bus = EventBus::new();
        assert_eq!(bus.emit(&GameEvent::state_changed("x")), 0);
    }
}
