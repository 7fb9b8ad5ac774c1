//! Flagged-plan aggregation: per-material and per-temperature summary.
//!
//! For each catalog material the flagged cells are split by beverage
//! temperature and the material lands in one bucket:
//!
//! | Hot cells | Cold cells | Bucket |
//! |-----------|------------|--------|
//! | 1 | 1 | pair (`hot_and_cold`) |
//! | 1 | 0 | `hot_only` |
//! | 0 | 1 | `cold_only` |
//! | ≥2 at either temperature | | ambiguous, in no list |
//! | 0 | 0 | untested |
//!
//! Warm cells never take part in pairing but still count as flagged tests and
//! as "material flagged" for the question tier.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Catalog;
use crate::constants::PAIRING_TEMPERATURES;
use crate::store::CellSet;
use crate::types::{CellKey, Material, Temperature};

/// Where a material falls after partitioning its flagged cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialBucket {
    Pair,
    HotOnly,
    ColdOnly,
    /// Two or more flagged cells at one beverage temperature.
    Ambiguous,
    Untested,
}

impl MaterialBucket {
    pub fn from_counts(hot: usize, cold: usize) -> Self {
        match (hot, cold) {
            (h, c) if h >= 2 || c >= 2 => MaterialBucket::Ambiguous,
            (1, 1) => MaterialBucket::Pair,
            (1, 0) => MaterialBucket::HotOnly,
            (0, 1) => MaterialBucket::ColdOnly,
            _ => MaterialBucket::Untested,
        }
    }
}

/// Immutable summary of the flagged set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Aggregate {
    pub by_material: BTreeMap<Material, Vec<CellKey>>,
    pub by_temp: BTreeMap<Temperature, Vec<CellKey>>,
    pub hot_and_cold: Vec<Material>,
    pub hot_only: Vec<Material>,
    pub cold_only: Vec<Material>,
    /// Total flagged cells, Warm and ambiguous ones included.
    pub flagged_count: usize,
}

/// Summarize `flagged` over the catalog's materials.
pub fn aggregate(flagged: &CellSet, catalog: &Catalog) -> Aggregate {
    aggregate_keys(flagged.keys(), catalog)
}

/// [`aggregate`] over a plain key list.
pub fn aggregate_keys(
    flagged: impl IntoIterator<Item = CellKey>,
    catalog: &Catalog,
) -> Aggregate {
    let flagged: Vec<CellKey> = flagged.into_iter().collect();

    let mut by_material = BTreeMap::new();
    let mut hot_and_cold = Vec::new();
    let mut hot_only = Vec::new();
    let mut cold_only = Vec::new();

    for &material in catalog.materials() {
        let cells: Vec<CellKey> = flagged
            .iter()
            .copied()
            .filter(|k| k.material == material)
            .collect();
        let hot = cells.iter().filter(|k| k.bev_temp == Temperature::Hot).count();
        let cold = cells.iter().filter(|k| k.bev_temp == Temperature::Cold).count();
        match MaterialBucket::from_counts(hot, cold) {
            MaterialBucket::Pair => hot_and_cold.push(material),
            MaterialBucket::HotOnly => hot_only.push(material),
            MaterialBucket::ColdOnly => cold_only.push(material),
            MaterialBucket::Ambiguous | MaterialBucket::Untested => {}
        }
        by_material.insert(material, cells);
    }

    let by_temp = PAIRING_TEMPERATURES
        .iter()
        .map(|&temp| {
            let cells = flagged
                .iter()
                .copied()
                .filter(|k| k.bev_temp == temp)
                .collect();
            (temp, cells)
        })
        .collect();

    Aggregate {
        by_material,
        by_temp,
        hot_and_cold,
        hot_only,
        cold_only,
        flagged_count: flagged.len(),
    }
}

impl Aggregate {
    pub fn num_pairs(&self) -> usize {
        self.hot_and_cold.len()
    }

    pub fn num_hot_only(&self) -> usize {
        self.hot_only.len()
    }

    pub fn num_cold_only(&self) -> usize {
        self.cold_only.len()
    }

    pub fn num_singles(&self) -> usize {
        self.num_hot_only() + self.num_cold_only()
    }

    /// Materials with at least one flagged cell at any temperature.
    pub fn num_materials(&self) -> usize {
        self.by_material.values().filter(|c| !c.is_empty()).count()
    }

    /// Classified materials in narrative order: pairs, then hot-only, then cold-only.
    pub fn materials_flagged(&self) -> Vec<Material> {
        self.hot_and_cold
            .iter()
            .chain(&self.hot_only)
            .chain(&self.cold_only)
            .copied()
            .collect()
    }

    /// Bucket of one material in this aggregate.
    pub fn bucket_of(&self, material: Material) -> MaterialBucket {
        let cells = match self.by_material.get(&material) {
            Some(cells) => cells,
            None => return MaterialBucket::Untested,
        };
        let hot = cells.iter().filter(|k| k.bev_temp == Temperature::Hot).count();
        let cold = cells.iter().filter(|k| k.bev_temp == Temperature::Cold).count();
        MaterialBucket::from_counts(hot, cold)
    }

    // ── plan-shape predicates ──

    pub fn none_selected(&self) -> bool {
        self.num_pairs() == 0 && self.num_hot_only() == 0 && self.num_cold_only() == 0
    }

    pub fn only_hot(&self) -> bool {
        self.num_hot_only() > 0 && self.num_cold_only() == 0 && self.num_pairs() == 0
    }

    pub fn only_cold(&self) -> bool {
        self.num_cold_only() > 0 && self.num_hot_only() == 0 && self.num_pairs() == 0
    }

    pub fn no_pairs(&self) -> bool {
        self.num_pairs() == 0 && (self.num_hot_only() > 0 || self.num_cold_only() > 0)
    }

    pub fn only_pairs(&self) -> bool {
        self.num_pairs() > 0 && self.num_hot_only() == 0 && self.num_cold_only() == 0
    }
}
