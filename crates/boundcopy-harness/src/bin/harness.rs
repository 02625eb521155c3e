//! CLI entrypoint for the boundcopy harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use boundcopy_core::resolve_capacity;
use boundcopy_harness::fixtures::fixture_paths;
use boundcopy_harness::structured_log::{
    LogEmitter, LogEntry, LogLevel, now_utc, validate_log_file,
};
use boundcopy_harness::{
    CopyHarness, FixtureSet, HarnessError, TestRunner, VerificationReport, VerificationSummary,
    session,
};

/// Adversarial copy tooling for boundcopy.
#[derive(Debug, Parser)]
#[command(name = "boundcopy-harness")]
#[command(about = "Adversarial copy harness for boundcopy")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the boundary matrix against a fresh buffer per case.
    RunMatrix {
        /// Buffer capacity in bytes (defaults to BOUNDCOPY_CAPACITY, then 100).
        #[arg(long)]
        capacity: Option<usize>,
        /// Structured JSONL log path (if omitted, prints to stdout).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Output report path (markdown); a JSON twin is written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Run identifier embedded in trace ids.
        #[arg(long, default_value = "local")]
        run_id: String,
    },
    /// Verify buffer behavior against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long, default_value = "crates/boundcopy-harness/fixtures")]
        fixture: PathBuf,
        /// Output report path (markdown); a JSON twin is written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Validate a structured JSONL log against the log schema.
    ValidateLog {
        /// Structured JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::RunMatrix {
            capacity,
            log,
            report,
            run_id,
        } => {
            let capacity = resolve_capacity(capacity)?;
            let harness = CopyHarness::with_capacity(capacity);
            let mut emitter = match &log {
                Some(path) => LogEmitter::to_file(path, "matrix", &run_id)?,
                None => LogEmitter::to_stdout("matrix", &run_id),
            };

            eprintln!("Running copy matrix at capacity {capacity}");
            let report_doc = session::drive(harness.run_matrix(), &mut emitter)?;
            eprintln!(
                "Matrix complete: total={}, passed={}, failed={}, truncated={}, bytes_dropped={}",
                report_doc.total,
                report_doc.passed,
                report_doc.failed,
                report_doc.ledger.truncated,
                report_doc.ledger.bytes_dropped
            );

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                let json_path = report_path.with_extension("json");
                std::fs::write(&report_path, report_doc.to_markdown())?;
                std::fs::write(&json_path, report_doc.to_json()?)?;
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "report_written")
                        .with_capacity(capacity.get())
                        .with_artifacts(vec![
                            report_path.display().to_string(),
                            json_path.display().to_string(),
                        ]),
                )?;
                emitter.flush()?;
            }

            if !report_doc.all_passed() {
                return Err("Copy matrix reported invariant violations".into());
            }
        }
        Command::Verify {
            fixture,
            report,
            timestamp,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let mut fixture_sets = Vec::new();
            for path in fixture_paths(&fixture)? {
                match FixtureSet::from_file(&path) {
                    Ok(set) => fixture_sets.push(set),
                    Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                }
            }
            if fixture_sets.is_empty() {
                return Err(HarnessError::NoFixtures { dir: fixture }.into());
            }

            let runner = TestRunner::new("fixture-verify");
            let mut results = Vec::new();
            for set in &fixture_sets {
                results.extend(runner.run(set));
            }
            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.capacity.cmp(&b.capacity))
                    .then_with(|| a.case_name.cmp(&b.case_name))
            });

            let report_doc = VerificationReport {
                title: String::from("boundcopy Fixture Verification Report"),
                timestamp: timestamp.unwrap_or_else(now_utc),
                summary: VerificationSummary::from_results(results),
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failed in report_doc.summary.results.iter().filter(|r| !r.passed) {
                eprintln!(
                    "FAIL {}: {}",
                    failed.case_name,
                    failed.diff.as_deref().unwrap_or("")
                );
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(&report_path, report_doc.to_markdown())?;
                std::fs::write(report_path.with_extension("json"), report_doc.to_json()?)?;
            }

            if !report_doc.summary.all_passed() {
                return Err("Fixture verification failed".into());
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!(
                "Validated {} line(s) in {}: {} error(s)",
                lines,
                log.display(),
                errors.len()
            );
            if !errors.is_empty() {
                return Err("Structured log failed validation".into());
            }
        }
    }

    Ok(())
}
