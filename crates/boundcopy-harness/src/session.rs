//! Logged matrix runs.
//!
//! Ties a [`MatrixRun`] to a [`LogEmitter`] and a [`TruncationLedger`]: one
//! `case_result` line per case, bracketed by `matrix_start` and
//! `matrix_summary`, and a [`MatrixReport`] at the end. A case that cannot
//! allocate its input or buffers ends the run with a `matrix_abort` line.

use std::time::Instant;

use boundcopy_core::TruncationLedger;

use crate::error::HarnessError;
use crate::matrix::{CaseResult, CopyTarget, MatrixRun};
use crate::report::MatrixReport;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, now_utc};

pub const REPORT_TITLE: &str = "boundcopy Adversarial Copy Matrix";

/// Structured log line for one case.
#[must_use]
pub fn case_entry(result: &CaseResult) -> LogEntry {
    let (level, outcome) = if result.passed() {
        (LogLevel::Info, Outcome::Pass)
    } else {
        (LogLevel::Error, Outcome::Fail)
    };
    let entry = LogEntry::new("", level, "case_result")
        .with_capacity(result.capacity)
        .with_case(result.case.name(), result.input_len, &result.input_sha256)
        .with_copy(&result.outcome, result.length)
        .with_outcome(outcome);
    if result.passed() {
        entry
    } else {
        entry.with_violations(result.violations.iter().map(ToString::to_string).collect())
    }
}

/// Drain `run`, logging every case, and summarize it.
///
/// Fails with [`HarnessError::Buffer`] on the first allocation failure.
pub fn drive<T: CopyTarget>(
    run: MatrixRun<T>,
    emitter: &mut LogEmitter,
) -> Result<MatrixReport, HarnessError> {
    let started = Instant::now();
    let capacity = run.capacity().get();
    let ledger = TruncationLedger::new();
    let mut report = MatrixReport::new(REPORT_TITLE, now_utc(), capacity);

    emitter.emit_entry(
        LogEntry::new("", LogLevel::Info, "matrix_start")
            .with_capacity(capacity)
            .with_details(serde_json::json!({ "cases": run.len() })),
    )?;

    for (index, result) in run.enumerate() {
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Error, "matrix_abort")
                        .with_capacity(capacity)
                        .with_outcome(Outcome::Error)
                        .with_details(serde_json::json!({
                            "case_index": index,
                            "error": err.to_string(),
                        })),
                )?;
                emitter.flush()?;
                return Err(err.into());
            }
        };
        ledger.record(&result.outcome, result.input_len);
        report.add(&result);
        emitter.emit_entry(case_entry(&result))?;
    }
    report.ledger = ledger.snapshot();

    let (level, outcome) = if report.all_passed() {
        (LogLevel::Info, Outcome::Pass)
    } else {
        (LogLevel::Error, Outcome::Fail)
    };
    emitter.emit_entry(
        LogEntry::new("", level, "matrix_summary")
            .with_capacity(capacity)
            .with_outcome(outcome)
            .with_duration_ms(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
            .with_details(serde_json::json!({
                "total": report.total,
                "passed": report.passed,
                "failed": report.failed,
                "ledger": report.ledger,
            })),
    )?;
    emitter.flush()?;
    Ok(report)
}
