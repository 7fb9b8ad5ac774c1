//! Shared environment configuration for the trial-grid binaries.
//!
//! Consolidates `TRIAL_GRID_BASE_PATH`, `TRIAL_GRID_PORT`, `TRIAL_GRID_CONFIG`,
//! `TRIAL_GRID_DATA_DIR` and `RAYON_NUM_THREADS` reads, plus tracing setup.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    init_tracing_with("info");
}

/// [`init_tracing`] with a different default filter.
pub fn init_tracing_with(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Ignore the error when a subscriber is already installed (tests, reruns).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Read `TRIAL_GRID_BASE_PATH` (default `"."`) and chdir into it. Exits on failure.
pub fn init_base_path() -> PathBuf {
    let base_path = std::env::var("TRIAL_GRID_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(&base_path);
    if std::env::set_current_dir(&base_path).is_err() {
        eprintln!("Failed to change directory to {}", base_path);
        std::process::exit(1);
    }
    if let Ok(cwd) = std::env::current_dir() {
        info!(cwd = %cwd.display(), "working directory");
    }
    path
}

/// Read `RAYON_NUM_THREADS` (default 8) and build the global pool.
/// Tolerates an already-initialized pool. Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("rayon pool already initialized");
    }
    info!(threads = num_threads, "rayon threads");
    num_threads
}

/// Read `TRIAL_GRID_PORT` (default 9000).
pub fn server_port() -> u16 {
    std::env::var("TRIAL_GRID_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9000)
}

/// Read `TRIAL_GRID_CONFIG` (default `config/grid.json`).
pub fn config_path() -> PathBuf {
    std::env::var("TRIAL_GRID_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/grid.json"))
}

/// Read `TRIAL_GRID_DATA_DIR` (default `data/session`).
pub fn data_dir() -> PathBuf {
    std::env::var("TRIAL_GRID_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/session"))
}
