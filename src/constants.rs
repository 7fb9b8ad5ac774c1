//! Grid constants: materials, temperatures, budget, and display strings.
//!
//! The grid is 6 materials × 3 beverage temperatures × 3 ambient temperatures
//! (54 trial slots). Plan feedback only considers the Hot and Cold beverage
//! columns, so a plan has at most [`BUDGET_TOTAL_TESTS`] = 6 × 2 meaningful tests.

use crate::types::{Material, Temperature};

/// Number of materials in the grid.
pub const MATERIAL_COUNT: usize = 6;

/// Number of temperature levels (beverage and ambient share the same scale).
pub const TEMPERATURE_COUNT: usize = 3;

/// Total number of trial slots: materials × beverage temps × ambient temps.
pub const NUM_CELLS: usize = MATERIAL_COUNT * TEMPERATURE_COUNT * TEMPERATURE_COUNT;

/// Fixed experiment budget reported in the budget check.
pub const BUDGET_TOTAL_TESTS: usize = 12;

/// Canonical material order. Aggregation buckets and narrative lists follow it.
pub const MATERIALS: [Material; MATERIAL_COUNT] = [
    Material::Aluminum,
    Material::Wood,
    Material::Styrofoam,
    Material::Clay,
    Material::Glass,
    Material::Plastic,
];

/// Canonical temperature order (Hot, Warm, Cold).
pub const TEMPERATURES: [Temperature; TEMPERATURE_COUNT] =
    [Temperature::Hot, Temperature::Warm, Temperature::Cold];

/// Beverage temperatures that take part in pair/single classification.
pub const PAIRING_TEMPERATURES: [Temperature; 2] = [Temperature::Hot, Temperature::Cold];

/// Blocking notice shown when an Interpret-mode click hits a cell without data.
pub const NOT_COLLECTED_NOTICE: &str = "You haven't collected data for this trial!";

/// Prompt returned when the plan has no classifiable tests.
pub const NONE_SELECTED_PROMPT: &str = "Please choose experiment(s) that you want to run.";

/// Confirmation asked before the only feedback attempt is spent.
pub const SINGLE_ATTEMPT_CONFIRMATION: &str =
    "You only have one attempt to receive feedback, are you sure you're ready to receive feedback?";

/// Annotation type attached to persisted feedback.
pub const FEEDBACK_ANNOTATION_TYPE: &str = "autoComment";

/// Suffix of chart trial identifiers (`Wood-HotLiquid`).
pub const TRIAL_ID_SUFFIX: &str = "Liquid";

/// Round-half-up percentage of the budget used by `num_tests`.
#[inline]
pub fn budget_percent(num_tests: usize) -> usize {
    (num_tests * 100 + BUDGET_TOTAL_TESTS / 2) / BUDGET_TOTAL_TESTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_percent_rounding() {
        assert_eq!(budget_percent(0), 0);
        assert_eq!(budget_percent(1), 8);
        assert_eq!(budget_percent(5), 42);
        assert_eq!(budget_percent(6), 50);
        assert_eq!(budget_percent(7), 58);
        assert_eq!(budget_percent(11), 92);
        assert_eq!(budget_percent(12), 100);
    }

    #[test]
    fn test_num_cells() {
        assert_eq!(NUM_CELLS, 54);
    }
}
