//! # Storage Self-Test
//!
//! Runs every built-in storage scenario and reports the outcome.
//!
//! ## Usage
//!
//! ```bash
//! self_test           # run all scenarios
//! self_test --list    # print scenario names
//! ```
//!
//! Exits with status 0 only if every scenario passed.

use tektonik_core::harness::{register_core_scenarios, TestRegistry};

fn main() {
    let mut registry = TestRegistry::new();
    if let Err(err) = register_core_scenarios(&mut registry) {
        eprintln!("Cannot build the scenario registry: {err}");
        std::process::exit(2);
    }

    // Simple parsing, no external deps
    let args: Vec<String> = std::env::args().collect();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--list" | "-l" => {
                for name in registry.names() {
                    println!("{name}");
                }
                return;
            }
            "--help" | "-h" => {
                println!("Usage: self_test [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -l, --list    Print the registered scenario names");
                println!("  -h, --help    Show this help");
                return;
            }
            other => {
                eprintln!("Unknown option '{other}', try --help");
                std::process::exit(2);
            }
        }
    }

    println!("Running {} scenarios", registry.len());
    println!();

    let report = registry.run_all();
    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(()) => println!("Test successful '{}'.", outcome.name),
            Err(failure) => println!("Test failed '{}' with: {failure}", outcome.name),
        }
    }

    let failed = report.failed().count();
    println!();
    println!(
        "{} passed, {failed} failed",
        report.outcomes().len() - failed
    );

    if report.all_passed() {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
