//! Game settings and engine configuration.
//!
//! - `GameSettings`: player-facing options stored inside every `GameState`
//! - `SettingsPatch`: a shallow merge of selected fields, validated before use
//! - `EngineConfig`: construction-time options for the engine itself

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Default bound on the undo history.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Player-facing game options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Cards moved from stock to waste per flip (1..=3).
    pub draw_count: u8,

    /// How many times the waste may be recycled into the stock.
    /// `0` means unlimited.
    pub deck_cycling_limit: u32,

    /// Allow single-action moves of a card straight to its foundation.
    pub auto_move_to_foundation: bool,

    /// Read by the sound adapter; the engine only stores it.
    pub sound_enabled: bool,

    /// Read by the UI to decide whether to surface hints.
    pub show_hints: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            draw_count: 1,
            deck_cycling_limit: 0,
            auto_move_to_foundation: true,
            sound_enabled: true,
            show_hints: true,
        }
    }
}

impl GameSettings {
    /// Set the draw count (builder pattern).
    #[must_use]
    pub fn with_draw_count(mut self, draw_count: u8) -> Self {
        self.draw_count = draw_count;
        self
    }

    /// Set the deck-cycling limit (builder pattern).
    #[must_use]
    pub fn with_cycling_limit(mut self, limit: u32) -> Self {
        self.deck_cycling_limit = limit;
        self
    }

    /// Enable or disable auto-move to foundation (builder pattern).
    #[must_use]
    pub fn with_auto_move(mut self, enabled: bool) -> Self {
        self.auto_move_to_foundation = enabled;
        self
    }

    /// Enable or disable sound (builder pattern).
    #[must_use]
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Check the settings are internally consistent.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(1..=3).contains(&self.draw_count) {
            return Err(EngineError::InvalidSetting(format!(
                "draw count must be between 1 and 3, got {}",
                self.draw_count
            )));
        }
        Ok(())
    }

    /// Whether the waste may be recycled after `cycles` recycles already.
    #[must_use]
    pub fn allows_recycle(&self, cycles: u32) -> bool {
        self.deck_cycling_limit == 0 || cycles < self.deck_cycling_limit
    }
}

/// A partial settings update. `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub draw_count: Option<u8>,
    pub deck_cycling_limit: Option<u32>,
    pub auto_move_to_foundation: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub show_hints: Option<bool>,
}

impl SettingsPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draw_count(mut self, value: u8) -> Self {
        self.draw_count = Some(value);
        self
    }

    #[must_use]
    pub fn deck_cycling_limit(mut self, value: u32) -> Self {
        self.deck_cycling_limit = Some(value);
        self
    }

    #[must_use]
    pub fn auto_move_to_foundation(mut self, value: bool) -> Self {
        self.auto_move_to_foundation = Some(value);
        self
    }

    #[must_use]
    pub fn sound_enabled(mut self, value: bool) -> Self {
        self.sound_enabled = Some(value);
        self
    }

    #[must_use]
    pub fn show_hints(mut self, value: bool) -> Self {
        self.show_hints = Some(value);
        self
    }

    /// Shallow-merge into `settings`, producing the new settings.
    ///
    /// The result is validated; `settings` itself is never modified.
    pub fn apply(&self, settings: &GameSettings) -> Result<GameSettings, EngineError> {
        let merged = GameSettings {
            draw_count: self.draw_count.unwrap_or(settings.draw_count),
            deck_cycling_limit: self.deck_cycling_limit.unwrap_or(settings.deck_cycling_limit),
            auto_move_to_foundation: self
                .auto_move_to_foundation
                .unwrap_or(settings.auto_move_to_foundation),
            sound_enabled: self.sound_enabled.unwrap_or(settings.sound_enabled),
            show_hints: self.show_hints.unwrap_or(settings.show_hints),
        };
        merged.validate()?;
        Ok(merged)
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Construction-time engine options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of undo entries kept.
    pub max_history: usize,

    /// Settings used for the first game.
    pub settings: GameSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            settings: GameSettings::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the history bound (builder pattern).
    #[must_use]
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Set the initial settings (builder pattern).
    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }
}
