//! Core data structures: materials, temperatures, and trial cells.
//!
//! A trial slot is identified by a [`CellKey`] = (material, beverage temperature,
//! ambient temperature). A [`Cell`] is a key plus the time it entered a set.
//! Equality, ordering and hashing of a `Cell` only look at the key, so the same
//! slot added at two different times is still one cell.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MATERIALS, TEMPERATURES};
use crate::error::ParseError;

// ── Material ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Material {
    Aluminum,
    Wood,
    Styrofoam,
    Clay,
    Glass,
    Plastic,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Aluminum => "Aluminum",
            Material::Wood => "Wood",
            Material::Styrofoam => "Styrofoam",
            Material::Clay => "Clay",
            Material::Glass => "Glass",
            Material::Plastic => "Plastic",
        }
    }

    /// Position in the canonical material order.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MATERIALS
            .iter()
            .copied()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownMaterial(s.to_string()))
    }
}

// ── Temperature ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

impl Temperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Temperature::Hot => "Hot",
            Temperature::Warm => "Warm",
            Temperature::Cold => "Cold",
        }
    }

    /// Lowercase form used inside feedback sentences.
    pub fn label(&self) -> &'static str {
        match self {
            Temperature::Hot => "hot",
            Temperature::Warm => "warm",
            Temperature::Cold => "cold",
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Temperature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TEMPERATURES
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownTemperature(s.to_string()))
    }
}

// ── Cell identity ──

/// Identity of a trial slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellKey {
    pub material: Material,
    pub bev_temp: Temperature,
    pub air_temp: Temperature,
}

impl CellKey {
    pub fn new(material: Material, bev_temp: Temperature, air_temp: Temperature) -> Self {
        Self {
            material,
            bev_temp,
            air_temp,
        }
    }

    /// Parse the free-text triple carried by a trial-completion notification.
    pub fn parse(material: &str, bev_temp: &str, air_temp: &str) -> Result<Self, ParseError> {
        Ok(Self {
            material: material.parse()?,
            bev_temp: bev_temp.parse()?,
            air_temp: air_temp.parse()?,
        })
    }

    /// Every slot of the grid in canonical (material, bev, air) order.
    pub fn all() -> impl Iterator<Item = CellKey> {
        MATERIALS.into_iter().flat_map(|material| {
            TEMPERATURES.into_iter().flat_map(move |bev_temp| {
                TEMPERATURES
                    .into_iter()
                    .map(move |air_temp| CellKey::new(material, bev_temp, air_temp))
            })
        })
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.material, self.bev_temp, self.air_temp)
    }
}

/// A trial slot as stored in one of the session sets.
///
/// Serialized as `{material, bevTemp, airTemp, dateAdded}`; `dateAdded` is epoch
/// milliseconds and defaults to 0 when a restored payload omits it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(flatten)]
    pub key: CellKey,
    #[serde(default)]
    pub date_added: i64,
}

impl Cell {
    pub fn new(key: CellKey, date_added: i64) -> Self {
        Self { key, date_added }
    }

    /// Stamp `key` with the current wall-clock time.
    pub fn now(key: CellKey) -> Self {
        Self::new(key, now_millis())
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
