//! Random learner sessions: click a random set of cells in Flag mode, then ask
//! for feedback. Sessions are independent and run in parallel, each with its
//! own `SmallRng` seeded from the batch seed plus the session index.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::config::GridConfig;
use crate::error::SyncError;
use crate::feedback::FeedbackCase;
use crate::mode::Mode;
use crate::session::{FeedbackOutcome, Session};
use crate::sync::{HostBridge, OutboundMessage};
use crate::types::CellKey;

use super::sweep::CaseHistogram;

/// Host that accepts and drops everything.
struct DiscardHost;

impl HostBridge for DiscardHost {
    fn post(&mut self, _message: &OutboundMessage) -> Result<(), SyncError> {
        Ok(())
    }
}

/// Outcome of one simulated session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    pub clicks: usize,
    pub flagged: usize,
    pub case: Option<FeedbackCase>,
}

pub struct SimulationResult {
    pub records: Vec<SessionRecord>,
    pub histogram: CaseHistogram,
    pub mean_flagged: f64,
    pub elapsed: Duration,
}

/// Play one session of up to `max_clicks` random clicks over `config`'s grid.
pub fn simulate_session(
    config: &GridConfig,
    max_clicks: usize,
    rng: &mut SmallRng,
) -> SessionRecord {
    let mut session = Session::new(config.clone(), Box::new(DiscardHost));
    let cells: Vec<CellKey> = CellKey::all()
        .filter(|k| config.catalog.is_cell_available(k))
        .collect();

    let clicks = rng.random_range(0..=max_clicks);
    for step in 0..clicks {
        let key = cells[rng.random_range(0..cells.len())];
        if let Err(err) = session.cell_clicked_at(key, step as i64) {
            debug!(cell = %key, error = %err, "simulated click rejected");
        }
    }

    let case = match session.request_feedback(true) {
        Ok(FeedbackOutcome::Given(classification)) => classification.case(),
        _ => None,
    };
    SessionRecord {
        clicks,
        flagged: session.store().flagged().len(),
        case,
    }
}

/// Run `num_sessions` random Flag-mode sessions in parallel.
pub fn simulate_batch(
    config: &GridConfig,
    num_sessions: usize,
    max_clicks: usize,
    seed: u64,
) -> SimulationResult {
    let start = Instant::now();
    let config = GridConfig {
        mode: Mode::Flag,
        ..config.clone()
    };

    let records: Vec<SessionRecord> = (0..num_sessions)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            simulate_session(&config, max_clicks, &mut rng)
        })
        .collect();

    let mut histogram = CaseHistogram::default();
    for record in &records {
        histogram.record_case(record.case);
    }

    let mean_flagged = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.flagged as f64).sum::<f64>() / records.len() as f64
    };

    SimulationResult {
        records,
        histogram,
        mean_flagged,
        elapsed: start.elapsed(),
    }
}
