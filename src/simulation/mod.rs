//! Offline plan analysis.
//!
//! - [`sweep`]: classify every flag plan at one ambient temperature
//! - [`engine`]: seeded random learner sessions driven through [`Session`](crate::session::Session)

pub mod engine;
pub mod sweep;

pub use engine::{simulate_batch, simulate_session, SessionRecord, SimulationResult};
pub use sweep::{plan_cells, plan_from_mask, sweep_plans, CaseHistogram, SweepResult, NUM_PLANS};
