//! trial-grid-sweep: classify every flag plan and print the feedback-case histogram.
//!
//! Plans range over the 12 material × {Hot, Cold} cells at one ambient
//! temperature (4096 plans). `--air all` sweeps each ambient temperature and
//! merges the counts.

use trial_grid::constants::TEMPERATURES;
use trial_grid::feedback::FeedbackCase;
use trial_grid::simulation::{sweep_plans, CaseHistogram, NUM_PLANS};
use trial_grid::types::Temperature;

fn print_usage() {
    eprintln!("Usage: trial-grid-sweep [--air hot|warm|cold|all] [--by-size] [--output FILE]");
}

fn main() {
    trial_grid::env_config::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let mut air_arg = "hot".to_string();
    let mut by_size = false;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--air" => {
                i += 1;
                if i < args.len() {
                    air_arg = args[i].clone();
                }
            }
            "--by-size" => {
                by_size = true;
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let air_temps: Vec<Temperature> = if air_arg.eq_ignore_ascii_case("all") {
        TEMPERATURES.to_vec()
    } else {
        match TEMPERATURES
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(&air_arg))
        {
            Some(&t) => vec![t],
            None => {
                eprintln!("Unknown temperature: {}", air_arg);
                print_usage();
                std::process::exit(1);
            }
        }
    };

    let threads = trial_grid::env_config::init_rayon_threads();
    println!("=== trial-grid-sweep ===");
    println!(
        "{} plans per ambient temperature, {} temperature(s), {} threads",
        NUM_PLANS,
        air_temps.len(),
        threads
    );

    let mut merged = CaseHistogram::default();
    for air in air_temps {
        let result = sweep_plans(air);
        println!(
            "\nAmbient {}: {} plans in {:.1} ms",
            result.air_temp,
            result.histogram.total,
            result.elapsed.as_secs_f64() * 1000.0
        );
        if by_size {
            print_by_size(&result.plans_by_size);
        }
        merged = merged.merge(result.histogram);
    }

    println!();
    print_histogram(&merged);

    if let Some(path) = output {
        let json = match serde_json::to_string_pretty(&merged) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Failed to serialize histogram: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&path, json) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
        println!("\nHistogram written to {}", path);
    }
}

fn print_histogram(h: &CaseHistogram) {
    println!("{:>14}  {:>6}  {:>6}", "case", "plans", "share");
    println!("{}", "-".repeat(30));
    let share = |n: usize| 100.0 * n as f64 / h.total.max(1) as f64;
    println!(
        "{:>14}  {:>6}  {:>5.1}%",
        "none selected",
        h.none_selected,
        share(h.none_selected)
    );
    for case in FeedbackCase::ALL {
        let n = h.count(case);
        println!("{:>14}  {:>6}  {:>5.1}%", case.as_str(), n, share(n));
    }
    println!("{:>14}  {:>6}", "total", h.total);
}

fn print_by_size(plans_by_size: &[std::collections::BTreeMap<FeedbackCase, usize>]) {
    print!("{:>5}", "tests");
    for case in FeedbackCase::ALL {
        print!("  {:>4}", case.as_str());
    }
    println!();
    for (size, counts) in plans_by_size.iter().enumerate() {
        print!("{:>5}", size);
        for case in FeedbackCase::ALL {
            print!("  {:>4}", counts.get(&case).copied().unwrap_or(0));
        }
        println!();
    }
}
