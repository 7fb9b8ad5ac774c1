//! # Trial Grid: experiment-plan grid and feedback classifier
//!
//! State manager for an instructional grid of experiment trials
//! (material × beverage temperature × ambient temperature) and the engine
//! that turns a flagged experiment plan into pedagogical feedback.
//!
//! ## Data flow
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | 1 | [`mode`] | A click is interpreted by the session's mode (collect, flag, interpret) and mutates the [`store::Store`] |
//! | 2 | [`sync`] | The whole store is posted to the host after every mutation (best effort) |
//! | 3 | [`aggregate`] | On a feedback request the flagged set is reduced to per-material buckets |
//! | 4 | [`feedback`] | The aggregate is classified into case 1A–2E and rendered as summary, questions and budget check |
//!
//! [`session::Session`] owns all of the above for one learner. [`server`]
//! exposes a session over HTTP; [`simulation`] runs offline plan sweeps.
//!
//! ## Grid
//!
//! 6 materials × 3 beverage temperatures × 3 ambient temperatures = 54 slots.
//! Only Hot and Cold beverage cells take part in pairing; Warm cells still
//! count toward the budget of 12 tests.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod feedback;
pub mod mode;
pub mod server;
pub mod session;
pub mod simulation;
pub mod store;
pub mod sync;
pub mod trial_id;
pub mod types;
