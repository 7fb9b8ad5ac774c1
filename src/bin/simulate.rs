//! trial-grid-simulate: random Flag-mode learner sessions and their feedback cases.

use trial_grid::config::GridConfig;
use trial_grid::constants::BUDGET_TOTAL_TESTS;
use trial_grid::feedback::FeedbackCase;
use trial_grid::mode::Mode;
use trial_grid::simulation::simulate_batch;

struct Args {
    num_sessions: usize,
    max_clicks: usize,
    seed: u64,
    config: Option<String>,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut num_sessions = 10_000usize;
    let mut max_clicks = BUDGET_TOTAL_TESTS;
    let mut seed = 42u64;
    let mut config: Option<String> = None;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sessions" => {
                i += 1;
                if i < args.len() {
                    num_sessions = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --sessions value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--max-clicks" => {
                i += 1;
                if i < args.len() {
                    max_clicks = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --max-clicks value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    config = Some(args[i].clone());
                }
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                println!("Usage: trial-grid-simulate [OPTIONS]");
                println!("  --sessions N     Number of sessions (default: 10000)");
                println!("  --max-clicks N   Upper bound on clicks per session (default: 12)");
                println!("  --seed S         Random seed (default: 42)");
                println!("  --config FILE    Grid config JSON (default: all temperatures)");
                println!("  --output FILE    Write the case histogram as JSON");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        num_sessions,
        max_clicks,
        seed,
        config,
        output,
    }
}

fn main() {
    // Per-session classification logs are info level; keep them quiet here.
    trial_grid::env_config::init_tracing_with("warn");
    let args = parse_args();

    let config = match &args.config {
        Some(path) => GridConfig::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("{} ({})", e, path);
            std::process::exit(1);
        }),
        None => GridConfig::new(Mode::Flag),
    };

    let threads = trial_grid::env_config::init_rayon_threads();
    println!("=== trial-grid-simulate ===");
    println!(
        "{} sessions, up to {} clicks each, seed={}, {} threads",
        args.num_sessions, args.max_clicks, args.seed, threads
    );

    let result = simulate_batch(&config, args.num_sessions, args.max_clicks, args.seed);
    let h = &result.histogram;

    println!(
        "\nSimulated in {:.2} s, mean flagged cells {:.2}",
        result.elapsed.as_secs_f64(),
        result.mean_flagged
    );
    println!("{:>14}  {:>8}", "case", "sessions");
    println!("{}", "-".repeat(24));
    println!("{:>14}  {:>8}", "none selected", h.none_selected);
    for case in FeedbackCase::ALL {
        println!("{:>14}  {:>8}", case.as_str(), h.count(case));
    }

    if let Some(path) = &args.output {
        match serde_json::to_string_pretty(h) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    eprintln!("Failed to write {}: {}", path, e);
                    std::process::exit(1);
                }
                println!("\nHistogram written to {}", path);
            }
            Err(e) => {
                eprintln!("Failed to serialize histogram: {}", e);
                std::process::exit(1);
            }
        }
    }
}
