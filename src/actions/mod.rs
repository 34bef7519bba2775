//! Player actions.
//!
//! The orchestrator is the only code that both commits state and emits
//! events. Each operation reads the latest committed state, computes the
//! transition with the pure functions in `rules`, commits it through the
//! `StateManager` and only then notifies subscribers.

pub mod orchestrator;

pub use orchestrator::{ActionContext, ActionOrchestrator, ActivateOutcome};
