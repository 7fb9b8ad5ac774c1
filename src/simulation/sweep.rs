//! Exhaustive sweep over every flag plan at one ambient temperature.
//!
//! At a fixed ambient temperature the pairing-relevant slots are the 12
//! material × {Hot, Cold} cells, so there are 2^12 = 4096 plans. Each plan is
//! aggregated and classified independently on the rayon pool.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::aggregate_keys;
use crate::config::Catalog;
use crate::constants::{MATERIALS, PAIRING_TEMPERATURES};
use crate::feedback::{classify, Classification, FeedbackCase};
use crate::types::{CellKey, Temperature};

pub const PLAN_CELL_COUNT: usize = MATERIALS.len() * PAIRING_TEMPERATURES.len();
pub const NUM_PLANS: u32 = 1 << PLAN_CELL_COUNT;

/// Case counts over a set of classified plans.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaseHistogram {
    pub none_selected: usize,
    pub by_case: BTreeMap<FeedbackCase, usize>,
    pub total: usize,
}

impl CaseHistogram {
    pub fn record(&mut self, classification: &Classification) {
        self.record_case(classification.case());
    }

    /// Count one outcome; `None` is the none-selected prompt.
    pub fn record_case(&mut self, case: Option<FeedbackCase>) {
        match case {
            Some(case) => *self.by_case.entry(case).or_insert(0) += 1,
            None => self.none_selected += 1,
        }
        self.total += 1;
    }

    pub fn merge(mut self, other: CaseHistogram) -> CaseHistogram {
        self.none_selected += other.none_selected;
        for (case, n) in other.by_case {
            *self.by_case.entry(case).or_insert(0) += n;
        }
        self.total += other.total;
        self
    }

    pub fn count(&self, case: FeedbackCase) -> usize {
        self.by_case.get(&case).copied().unwrap_or(0)
    }
}

pub struct SweepResult {
    pub air_temp: Temperature,
    pub histogram: CaseHistogram,
    /// Plans per flagged-cell count, indexed 0..=12.
    pub plans_by_size: Vec<BTreeMap<FeedbackCase, usize>>,
    pub elapsed: Duration,
}

/// The 12 plan slots at `air_temp`, in material order, Hot before Cold.
pub fn plan_cells(air_temp: Temperature) -> Vec<CellKey> {
    MATERIALS
        .iter()
        .flat_map(|&m| {
            PAIRING_TEMPERATURES
                .iter()
                .map(move |&bev| CellKey::new(m, bev, air_temp))
        })
        .collect()
}

/// Plan selected by the bits of `mask` over `cells`.
pub fn plan_from_mask(mask: u32, cells: &[CellKey]) -> Vec<CellKey> {
    cells
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, &k)| k)
        .collect()
}

/// Classify every plan at `air_temp` in parallel.
pub fn sweep_plans(air_temp: Temperature) -> SweepResult {
    let start = Instant::now();
    let cells = plan_cells(air_temp);
    let catalog = Catalog::default();

    let classified: Vec<(usize, Classification)> = (0..NUM_PLANS)
        .into_par_iter()
        .map(|mask| {
            let plan = plan_from_mask(mask, &cells);
            let size = plan.len();
            (size, classify(&aggregate_keys(plan, &catalog)))
        })
        .collect();

    let mut histogram = CaseHistogram::default();
    let mut plans_by_size = vec![BTreeMap::new(); PLAN_CELL_COUNT + 1];
    for (size, classification) in &classified {
        histogram.record(classification);
        if let Some(case) = classification.case() {
            *plans_by_size[*size].entry(case).or_insert(0) += 1;
        }
    }

    SweepResult {
        air_temp,
        histogram,
        plans_by_size,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_covers_every_plan() {
        let result = sweep_plans(Temperature::Warm);
        assert_eq!(result.histogram.total, NUM_PLANS as usize);
        // Only the empty plan has nothing classifiable.
        assert_eq!(result.histogram.none_selected, 1);
        for case in FeedbackCase::ALL {
            assert!(result.histogram.count(case) > 0, "{case} never reached");
        }
    }

    #[test]
    fn test_single_temperature_counts() {
        // Non-empty subsets of the six hot cells plus the same for cold.
        let result = sweep_plans(Temperature::Hot);
        let one_temp = result.histogram.count(FeedbackCase::Case1A)
            + result.histogram.count(FeedbackCase::Case1B)
            + result.histogram.count(FeedbackCase::Case1C);
        assert_eq!(one_temp, 2 * 63);
        // 1C: 5 or 6 materials at one temperature, (6 + 1) * 2.
        assert_eq!(result.histogram.count(FeedbackCase::Case1C), 14);
    }

    #[test]
    fn test_pairs_only_count() {
        let result = sweep_plans(Temperature::Cold);
        // Any non-empty subset of materials, each as a full pair.
        assert_eq!(result.histogram.count(FeedbackCase::Case2C), 63);
        assert_eq!(result.plans_by_size[2].get(&FeedbackCase::Case2C), Some(&6));
    }

    #[test]
    fn test_plan_from_mask() {
        let cells = plan_cells(Temperature::Hot);
        assert_eq!(cells.len(), 12);
        assert_eq!(plan_from_mask(0, &cells), Vec::<CellKey>::new());
        assert_eq!(plan_from_mask(0b11, &cells), cells[..2].to_vec());
    }
}
