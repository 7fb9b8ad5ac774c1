//! Interaction modes and their click policies.
//!
//! | Mode | Click on cell | Extra actions |
//! |------|---------------|---------------|
//! | Collect | `selected` becomes exactly {cell} | |
//! | Flag | toggle cell in `flagged` | feedback, plan reset |
//! | Interpret | toggle cell in `selected`; rejected if not completed | |
//!
//! A mode owns no state; it only decides how a click mutates the [`Store`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InteractionError};
use crate::store::Store;
use crate::types::{Cell, CellKey};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Collect,
    Flag,
    Interpret,
}

/// What a click did to the store.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    Selected,
    Deselected,
    Flagged,
    Unflagged,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Collect => "collect",
            Mode::Flag => "flag",
            Mode::Interpret => "interpret",
        }
    }

    /// Apply a click on `key` to `store`, stamping new entries with `date_added`.
    ///
    /// Interpret mode refuses cells that have no collected data; the store is
    /// left unchanged in that case.
    pub fn on_cell_clicked(
        &self,
        store: &mut Store,
        key: CellKey,
        date_added: i64,
    ) -> Result<ClickOutcome, InteractionError> {
        let cell = Cell::new(key, date_added);
        match self {
            Mode::Collect => {
                store.clear_selected();
                store.add_selected(cell);
                Ok(ClickOutcome::Selected)
            }
            Mode::Flag => {
                if store.is_flagged(&key) {
                    store.remove_flagged(&key);
                    Ok(ClickOutcome::Unflagged)
                } else {
                    store.add_flagged(cell);
                    Ok(ClickOutcome::Flagged)
                }
            }
            Mode::Interpret => {
                if !store.is_completed(&key) {
                    return Err(InteractionError::NotCollected(key));
                }
                if store.is_selected(&key) {
                    store.remove_selected(&key);
                    Ok(ClickOutcome::Deselected)
                } else {
                    store.add_selected(cell);
                    Ok(ClickOutcome::Selected)
                }
            }
        }
    }

    /// Interpret mode renders every cell without data as disabled.
    pub fn is_cell_disabled(&self, store: &Store, key: &CellKey) -> bool {
        matches!(self, Mode::Interpret) && !store.is_completed(key)
    }

    /// Error for an action that only Flag mode offers.
    pub(crate) fn require_flag(&self, action: &'static str) -> Result<(), InteractionError> {
        match self {
            Mode::Flag => Ok(()),
            mode => Err(InteractionError::UnsupportedInMode {
                action,
                mode: *mode,
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collect" => Ok(Mode::Collect),
            "flag" => Ok(Mode::Flag),
            "interpret" => Ok(Mode::Interpret),
            _ => Err(ConfigError::UnrecognizedMode(s.to_string())),
        }
    }
}

/// Flag-mode auto-score flavour. Only changes the guidance heading label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoScoreMode {
    Material,
    Temperature,
}

impl AutoScoreMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoScoreMode::Material => "material",
            AutoScoreMode::Temperature => "temperature",
        }
    }

    /// Suffix appended to the auto-score guidance heading.
    pub fn heading_label(&self) -> String {
        format!(" ({})", self.as_str())
    }
}

impl FromStr for AutoScoreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "material" => Ok(AutoScoreMode::Material),
            "temperature" => Ok(AutoScoreMode::Temperature),
            _ => Err(ConfigError::UnrecognizedAutoScoreMode(s.to_string())),
        }
    }
}
