#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # marksheet
//!
//! CLI entry point: evaluates mark-calculation and result-aggregation
//! payloads from JSON files and prints the outputs as JSON (default) or as
//! human-readable tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::*;
use marksheet::{
    marks::calculate_marks,
    payload::{load_marks_payload, load_results_payload},
    report::{render_marks_table, render_results_table},
    results::ResultAggregator,
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Evaluate subject marks for a batch of students
    Marks(PathBuf, bool),
    /// Aggregate evaluated subjects into final student results
    Results(PathBuf, bool),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the payload file path
    fn p() -> impl Parser<PathBuf> {
        positional("PAYLOAD").help("Path to a JSON payload file")
    }

    /// parses the table-output flag
    fn t() -> impl Parser<bool> {
        long("table")
            .help("Print a table instead of JSON")
            .switch()
    }

    let marks = construct!(Cmd::Marks(p(), t()))
        .to_options()
        .command("marks")
        .help("Calculate per-subject exam marks for a batch of students");

    let results = construct!(Cmd::Results(p(), t()))
        .to_options()
        .command("results")
        .help("Aggregate evaluated subjects into final results and GPAs");

    let cmd = construct!([marks, results]);

    cmd.to_options()
        .descr("Exam mark calculator and result aggregator")
        .run()
}

fn main() -> Result<()> {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Marks(path, table) => {
            let payload = load_marks_payload(&path)?;
            let batch = calculate_marks(&payload)?;
            if table {
                println!("{}", render_marks_table(&batch));
            } else {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&batch)
                        .context("Could not serialize mark batch")?
                );
            }
        }
        Cmd::Results(path, table) => {
            let payload = load_results_payload(&path)?;
            let aggregator = ResultAggregator::new(payload.grade_rules);
            let outcome = aggregator.aggregate(&payload.students);
            if table {
                println!("{}", render_results_table(&outcome));
            } else {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&outcome)
                        .context("Could not serialize aggregation outcome")?
                );
            }
        }
    };

    Ok(())
}
