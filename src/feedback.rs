//! Plan feedback: classify an [`Aggregate`] into a feedback case and render it.
//!
//! Decision order (first match wins):
//!
//! | Step | Condition | Result |
//! |------|-----------|--------|
//! | 1 | no pairs, no singles | `NoneSelected` prompt |
//! | 2 | only hot singles or only cold singles | 1A / 1B / 1C by material count |
//! | 3 | singles of both temperatures, no pairs | 2A (equal) / 2B (unequal) |
//! | 3 | pairs only | 2C |
//! | 4 | pairs and singles, pairs == singles | 2D |
//! | 4 | pairs and singles, pairs != singles | 2E (same narrative as 2D) |
//!
//! Every case except `NoneSelected` renders a summary, guiding questions, and a
//! budget check.

use std::fmt;

use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::constants::{budget_percent, BUDGET_TOTAL_TESTS, NONE_SELECTED_PROMPT};
use crate::types::{Material, Temperature};

// ── Feedback case ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub enum FeedbackCase {
    #[serde(rename = "1A")]
    Case1A,
    #[serde(rename = "1B")]
    Case1B,
    #[serde(rename = "1C")]
    Case1C,
    #[serde(rename = "2A")]
    Case2A,
    #[serde(rename = "2B")]
    Case2B,
    #[serde(rename = "2C")]
    Case2C,
    #[serde(rename = "2D")]
    Case2D,
    #[serde(rename = "2E")]
    Case2E,
}

impl FeedbackCase {
    pub const ALL: [FeedbackCase; 8] = [
        FeedbackCase::Case1A,
        FeedbackCase::Case1B,
        FeedbackCase::Case1C,
        FeedbackCase::Case2A,
        FeedbackCase::Case2B,
        FeedbackCase::Case2C,
        FeedbackCase::Case2D,
        FeedbackCase::Case2E,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCase::Case1A => "1A",
            FeedbackCase::Case1B => "1B",
            FeedbackCase::Case1C => "1C",
            FeedbackCase::Case2A => "2A",
            FeedbackCase::Case2B => "2B",
            FeedbackCase::Case2C => "2C",
            FeedbackCase::Case2D => "2D",
            FeedbackCase::Case2E => "2E",
        }
    }

    /// Display-log marker, e.g. `[Case 2D]`.
    pub fn log_marker(&self) -> String {
        format!("[Case {}]", self.as_str())
    }
}

impl fmt::Display for FeedbackCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Plan shape ──

/// Which branch of the decision tree a plan takes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanShape {
    OnlyHot,
    OnlyCold,
    NoPairs,
    OnlyPairs,
    PairsEqualSingles,
    PairsUnequalSingles,
}

/// Shape of the plan, or `None` when nothing classifiable is flagged.
pub fn classify_shape(agg: &Aggregate) -> Option<PlanShape> {
    if agg.none_selected() {
        return None;
    }
    if agg.only_hot() {
        return Some(PlanShape::OnlyHot);
    }
    if agg.only_cold() {
        return Some(PlanShape::OnlyCold);
    }
    if agg.no_pairs() {
        return Some(PlanShape::NoPairs);
    }
    if agg.only_pairs() {
        return Some(PlanShape::OnlyPairs);
    }
    if agg.num_pairs() == agg.num_singles() {
        Some(PlanShape::PairsEqualSingles)
    } else {
        Some(PlanShape::PairsUnequalSingles)
    }
}

// ── Question tier ──

/// Follow-up question chosen by how many distinct materials the plan touches.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuestionTier {
    AddTests,
    AddOrEliminate,
    Eliminate,
}

impl QuestionTier {
    pub fn from_num_materials(num_materials: usize) -> Self {
        match num_materials {
            0..=2 => QuestionTier::AddTests,
            3..=4 => QuestionTier::AddOrEliminate,
            _ => QuestionTier::Eliminate,
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            QuestionTier::AddTests => {
                "Based on what you know about the six materials, are there any additional tests it would be helpful to add?"
            }
            QuestionTier::AddOrEliminate => {
                "Based on what you know about the six materials, are there any tests you should add or eliminate from your plan?"
            }
            QuestionTier::Eliminate => {
                "Based on what you know about the six materials, are there any tests you can eliminate from your plan?"
            }
        }
    }
}

// ── Rendered feedback ──

/// Three-part feedback for one classified plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanFeedback {
    pub case: FeedbackCase,
    pub shape: PlanShape,
    pub summary: String,
    pub questions: String,
    pub budget_check: String,
}

impl PlanFeedback {
    /// HTML block displayed in the log and persisted as the feedback annotation.
    pub fn to_html(&self) -> String {
        format!(
            "<b>What your plan indicates:</b> {}<br/><br/>\
             <b>Questions to help improve your plan:</b> {}<br/><br/>\
             <b>Budget check:</b> {}<br/>",
            self.summary, self.questions, self.budget_check
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Nothing classifiable is flagged; the learner must pick experiments first.
    NoneSelected,
    Plan(PlanFeedback),
}

impl Classification {
    pub fn case(&self) -> Option<FeedbackCase> {
        match self {
            Classification::NoneSelected => None,
            Classification::Plan(plan) => Some(plan.case),
        }
    }

    /// Text shown to the learner and persisted as feedback.
    pub fn text(&self) -> String {
        match self {
            Classification::NoneSelected => NONE_SELECTED_PROMPT.to_string(),
            Classification::Plan(plan) => plan.to_html(),
        }
    }
}

/// Budget sentence for a plan using `num_tests` of the fixed budget.
pub fn budget_check(num_tests: usize) -> String {
    format!(
        "Your plan uses {} out of the {} possible tests ({}% of your budget). \
         Remember, your goal is to gather enough evidence to recommend a material \
         using as little of your budget as you can.",
        num_tests,
        BUDGET_TOTAL_TESTS,
        budget_percent(num_tests)
    )
}

/// Classify a plan. Pure: equal aggregates give equal output.
pub fn classify(agg: &Aggregate) -> Classification {
    let shape = match classify_shape(agg) {
        Some(shape) => shape,
        None => return Classification::NoneSelected,
    };

    let num_materials = agg.num_materials();
    let tier = QuestionTier::from_num_materials(num_materials);
    let compare = compare_sentence(&agg.materials_flagged());

    let (case, summary, questions) = match shape {
        PlanShape::OnlyHot | PlanShape::OnlyCold => {
            let temp = if shape == PlanShape::OnlyHot {
                Temperature::Hot
            } else {
                Temperature::Cold
            };
            single_temperature_feedback(temp.label(), num_materials, tier, &compare)
        }
        PlanShape::NoPairs | PlanShape::OnlyPairs => {
            let (case, summary) = pairs_or_no_pairs_summary(agg, shape, &compare);
            let questions = format!("{} {}", COMBINATION_QUESTION, tier.question());
            (case, summary, questions)
        }
        PlanShape::PairsEqualSingles | PlanShape::PairsUnequalSingles => {
            let case = if shape == PlanShape::PairsEqualSingles {
                FeedbackCase::Case2D
            } else {
                FeedbackCase::Case2E
            };
            let (summary, question) = mixed_summary(agg, &compare);
            (case, summary, format!("{} {}", question, tier.question()))
        }
    };

    Classification::Plan(PlanFeedback {
        case,
        shape,
        summary,
        questions,
        budget_check: budget_check(agg.flagged_count),
    })
}

// ── Narrative builders ──

const COMBINATION_QUESTION: &str =
    "Does running a combination of cold and hot tests help you to decide on the best material?";

const SINGLE_TEST_QUESTION: &str = "Does running only one test with one material and one temperature give you enough evidence to compare and decide on the best material?";

fn compare_sentence(materials: &[Material]) -> String {
    let names: Vec<&str> = materials.iter().map(|m| m.as_str()).collect();
    format!(
        "You want to compare {} material(s): {}.",
        names.len(),
        names.join(", ")
    )
}

fn undecided_summary(both: bool, compare: &str) -> String {
    format!(
        "It seems you are undecided between or want to investigate both temperature beverages \
         because your plan includes an equal number of {}hot and cold tests. {}",
        if both { "both " } else { "" },
        compare
    )
}

fn single_temperature_feedback(
    temp: &str,
    num_materials: usize,
    tier: QuestionTier,
    compare: &str,
) -> (FeedbackCase, String, String) {
    let summary = format!(
        "It seems you want to investigate materials for a {} beverage because your plan \
         includes only {} tests. {}",
        temp, temp, compare
    );
    let case = match tier {
        QuestionTier::AddTests => FeedbackCase::Case1A,
        QuestionTier::AddOrEliminate => FeedbackCase::Case1B,
        QuestionTier::Eliminate => FeedbackCase::Case1C,
    };
    let questions = if num_materials == 1 {
        format!("{} {}", SINGLE_TEST_QUESTION, QuestionTier::AddTests.question())
    } else {
        format!(
            "Does running only {} tests give you the evidence you need to decide on the best \
             material? {}",
            temp,
            tier.question()
        )
    };
    (case, summary, questions)
}

/// The temperature with more single-temperature materials, and the other one.
fn dominant_temperature(agg: &Aggregate) -> (Temperature, Temperature) {
    if agg.num_cold_only() > agg.num_hot_only() {
        (Temperature::Cold, Temperature::Hot)
    } else {
        (Temperature::Hot, Temperature::Cold)
    }
}

fn pairs_or_no_pairs_summary(
    agg: &Aggregate,
    shape: PlanShape,
    compare: &str,
) -> (FeedbackCase, String) {
    if shape == PlanShape::OnlyPairs {
        return (FeedbackCase::Case2C, undecided_summary(true, compare));
    }
    if agg.num_cold_only() == agg.num_hot_only() {
        return (FeedbackCase::Case2A, undecided_summary(true, compare));
    }
    let (more, less) = dominant_temperature(agg);
    let summary = format!(
        "It seems you want to investigate materials for a {} beverage because your plan \
         includes more {} tests than {} tests. {}",
        more.label(),
        more.label(),
        less.label(),
        compare
    );
    (FeedbackCase::Case2B, summary)
}

/// Summary and lead question shared by 2D and 2E.
fn mixed_summary(agg: &Aggregate, compare: &str) -> (String, String) {
    if agg.num_cold_only() == agg.num_hot_only() {
        return (
            undecided_summary(false, compare),
            COMBINATION_QUESTION.to_string(),
        );
    }
    let (more, _) = dominant_temperature(agg);
    let summary = format!(
        "It seems you want to investigate materials for a {} beverage because your plan \
         includes more {} tests. {}",
        more.label(),
        more.label(),
        compare
    );
    let question = format!(
        "Does running more {} tests give the evidence you need to decide on the best material?",
        more.label()
    );
    (summary, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_keys;
    use crate::config::Catalog;
    use crate::types::CellKey;
    use crate::types::Material::*;
    use crate::types::Temperature::{Cold, Hot, Warm};

    fn plan(cells: &[(Material, Temperature)]) -> Classification {
        let keys = cells.iter().map(|&(m, t)| CellKey::new(m, t, Hot));
        classify(&aggregate_keys(keys, &Catalog::default()))
    }

    fn expect_plan(c: Classification) -> PlanFeedback {
        match c {
            Classification::Plan(p) => p,
            Classification::NoneSelected => panic!("expected plan feedback"),
        }
    }

    #[test]
    fn test_none_selected() {
        let c = plan(&[]);
        assert_eq!(c, Classification::NoneSelected);
        assert_eq!(c.case(), None);
        assert_eq!(c.text(), NONE_SELECTED_PROMPT);

        // Warm-only plans have nothing to pair either.
        assert_eq!(plan(&[(Wood, Warm), (Clay, Warm)]), Classification::NoneSelected);
    }

    #[test]
    fn test_single_material_hot() {
        let p = expect_plan(plan(&[(Wood, Hot)]));
        assert_eq!(p.case, FeedbackCase::Case1A);
        assert_eq!(p.shape, PlanShape::OnlyHot);
        assert!(p.summary.contains("for a hot beverage"));
        assert!(p.summary.contains("compare 1 material(s): Wood."));
        assert!(p.questions.starts_with(SINGLE_TEST_QUESTION));
        assert!(p.budget_check.contains("1 out of the 12 possible tests (8% of your budget)"));
    }

    #[test]
    fn test_only_cold_tiers() {
        let two = expect_plan(plan(&[(Wood, Cold), (Clay, Cold)]));
        assert_eq!(two.case, FeedbackCase::Case1A);
        assert!(two.questions.starts_with("Does running only cold tests"));
        assert!(two.questions.ends_with("helpful to add?"));

        let four = expect_plan(plan(&[(Wood, Cold), (Clay, Cold), (Glass, Cold), (Plastic, Cold)]));
        assert_eq!(four.case, FeedbackCase::Case1B);
        assert!(four.questions.ends_with("add or eliminate from your plan?"));

        let five = expect_plan(plan(&[
            (Aluminum, Cold),
            (Wood, Cold),
            (Styrofoam, Cold),
            (Clay, Cold),
            (Glass, Cold),
        ]));
        assert_eq!(five.case, FeedbackCase::Case1C);
        assert!(five.questions.ends_with("can eliminate from your plan?"));
    }

    #[test]
    fn test_warm_cells_raise_material_count() {
        // Two hot materials plus a Warm-only material: three materials touched.
        let p = expect_plan(plan(&[(Wood, Hot), (Clay, Hot), (Glass, Warm)]));
        assert_eq!(p.case, FeedbackCase::Case1B);
        assert!(p.summary.contains("compare 2 material(s): Wood, Clay."));
        assert!(p.budget_check.contains("3 out of the 12"));
    }

    #[test]
    fn test_no_pairs_equal_and_unequal() {
        let equal = expect_plan(plan(&[(Wood, Hot), (Clay, Cold)]));
        assert_eq!(equal.case, FeedbackCase::Case2A);
        assert!(equal.summary.contains("equal number of both hot and cold tests"));
        assert!(equal.questions.starts_with(COMBINATION_QUESTION));

        let unequal = expect_plan(plan(&[(Wood, Hot), (Clay, Cold), (Glass, Cold)]));
        assert_eq!(unequal.case, FeedbackCase::Case2B);
        assert!(unequal
            .summary
            .contains("for a cold beverage because your plan includes more cold tests than hot tests"));
        assert!(unequal.questions.ends_with("add or eliminate from your plan?"));
    }

    #[test]
    fn test_only_pairs() {
        let p = expect_plan(plan(&[(Wood, Hot), (Wood, Cold)]));
        assert_eq!(p.case, FeedbackCase::Case2C);
        assert_eq!(p.shape, PlanShape::OnlyPairs);
        assert!(p.summary.contains("equal number of both hot and cold tests"));
    }

    #[test]
    fn test_pairs_and_singles() {
        let d = expect_plan(plan(&[(Wood, Hot), (Wood, Cold), (Clay, Hot)]));
        assert_eq!(d.case, FeedbackCase::Case2D);
        assert!(d.summary.contains("for a hot beverage because your plan includes more hot tests."));
        assert!(d.questions.starts_with("Does running more hot tests give the evidence"));

        let e = expect_plan(plan(&[
            (Wood, Hot),
            (Wood, Cold),
            (Glass, Hot),
            (Glass, Cold),
            (Clay, Cold),
        ]));
        assert_eq!(e.case, FeedbackCase::Case2E);
        assert!(e.summary.contains("more cold tests."));

        // 2E with balanced singles takes the undecided narrative.
        let balanced = expect_plan(plan(&[(Wood, Hot), (Wood, Cold), (Clay, Hot), (Glass, Cold)]));
        assert_eq!(balanced.case, FeedbackCase::Case2E);
        assert!(balanced.summary.contains("equal number of hot and cold tests"));
        assert!(balanced.questions.starts_with(COMBINATION_QUESTION));
    }

    #[test]
    fn test_html_layout() {
        let p = expect_plan(plan(&[(Wood, Hot), (Wood, Cold)]));
        let html = p.to_html();
        assert!(html.starts_with("<b>What your plan indicates:</b> It seems"));
        assert!(html.contains("<br/><br/><b>Questions to help improve your plan:</b> Does"));
        assert!(html.contains("<br/><br/><b>Budget check:</b> Your plan uses 2 out of"));
        assert!(html.ends_with("<br/>"));
    }

    #[test]
    fn test_budget_check_text() {
        assert!(budget_check(6).contains("6 out of the 12 possible tests (50% of your budget)"));
        assert!(budget_check(6).ends_with("using as little of your budget as you can."));
    }

    #[test]
    fn test_case_labels() {
        let labels: Vec<&str> = FeedbackCase::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, ["1A", "1B", "1C", "2A", "2B", "2C", "2D", "2E"]);
        assert_eq!(FeedbackCase::Case2D.log_marker(), "[Case 2D]");
        assert_eq!(serde_json::to_value(FeedbackCase::Case1B).unwrap(), "1B");
    }
}
