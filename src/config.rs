//! Session configuration supplied by the host.
//!
//! The host hands the component a small JSON object:
//!
//! ```json
//! {
//!   "mode": "flag",
//!   "autoScoreMode": "material",
//!   "availableTemps": ["Hot", "Cold"],
//!   "maxFeedbackAttempts": 1
//! }
//! ```
//!
//! Only `mode` is required. An unrecognized mode is fatal: the session never
//! initializes.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{MATERIALS, TEMPERATURES};
use crate::error::ConfigError;
use crate::mode::{AutoScoreMode, Mode};
use crate::types::{CellKey, Material, Temperature};

/// Immutable per-session view of which materials and temperatures exist.
///
/// Materials keep the canonical grid order. Unavailable ambient temperatures
/// hide their cells from interaction; data for them is still stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    materials: Vec<Material>,
    available_temps: Vec<Temperature>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            materials: MATERIALS.to_vec(),
            available_temps: TEMPERATURES.to_vec(),
        }
    }
}

impl Catalog {
    /// Catalog with every material and the given temperatures (kept in canonical order).
    pub fn with_available_temps(temps: &[Temperature]) -> Result<Self, ConfigError> {
        let available_temps: Vec<Temperature> = TEMPERATURES
            .iter()
            .copied()
            .filter(|t| temps.contains(t))
            .collect();
        if available_temps.is_empty() {
            return Err(ConfigError::NoAvailableTemperatures);
        }
        Ok(Self {
            materials: MATERIALS.to_vec(),
            available_temps,
        })
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn available_temps(&self) -> &[Temperature] {
        &self.available_temps
    }

    pub fn is_temp_available(&self, temp: Temperature) -> bool {
        self.available_temps.contains(&temp)
    }

    /// Whether a cell is shown and clickable.
    pub fn is_cell_available(&self, key: &CellKey) -> bool {
        self.is_temp_available(key.air_temp)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridConfig {
    mode: String,
    #[serde(default)]
    auto_score_mode: Option<String>,
    #[serde(default)]
    available_temps: Option<Vec<String>>,
    #[serde(default)]
    max_feedback_attempts: Option<u32>,
}

/// Validated session configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub mode: Mode,
    pub auto_score_mode: Option<AutoScoreMode>,
    pub catalog: Catalog,
    pub max_feedback_attempts: Option<u32>,
}

impl GridConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            auto_score_mode: None,
            catalog: Catalog::default(),
            max_feedback_attempts: None,
        }
    }

    pub fn with_max_feedback_attempts(mut self, attempts: u32) -> Self {
        self.max_feedback_attempts = Some(attempts);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawGridConfig =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;

        let mode: Mode = raw.mode.parse()?;

        // The auto-score label only exists in Flag mode.
        let auto_score_mode = match (mode, raw.auto_score_mode.as_deref()) {
            (Mode::Flag, Some(name)) if !name.trim().is_empty() => {
                Some(name.parse::<AutoScoreMode>()?)
            }
            _ => None,
        };

        let catalog = match raw.available_temps {
            Some(names) => {
                let temps = names
                    .iter()
                    .map(|name| {
                        name.parse::<Temperature>()
                            .map_err(|_| ConfigError::UnknownTemperature(name.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Catalog::with_available_temps(&temps)?
            }
            None => Catalog::default(),
        };

        Ok(Self {
            mode,
            auto_score_mode,
            catalog,
            max_feedback_attempts: raw.max_feedback_attempts,
        })
    }

    /// Single-attempt feedback asks for confirmation and locks after use.
    pub fn is_single_feedback_attempt(&self) -> bool {
        self.max_feedback_attempts == Some(1)
    }
}
