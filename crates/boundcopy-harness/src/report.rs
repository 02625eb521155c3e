//! Human-readable (Markdown) and machine-readable (JSON) reports.

use serde::Serialize;

use boundcopy_core::LedgerSnapshot;

use crate::matrix::CaseResult;
use crate::verify::VerificationSummary;

/// One failing matrix case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow {
    pub case: String,
    pub input_len: usize,
    pub input_sha256: String,
    pub violations: Vec<String>,
}

/// Summary of a matrix run.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    pub title: String,
    pub timestamp: String,
    pub capacity: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ledger: LedgerSnapshot,
    pub failures: Vec<FailureRow>,
}

impl MatrixReport {
    /// Start an empty report.
    #[must_use]
    pub fn new(title: impl Into<String>, timestamp: impl Into<String>, capacity: usize) -> Self {
        Self {
            title: title.into(),
            timestamp: timestamp.into(),
            capacity,
            total: 0,
            passed: 0,
            failed: 0,
            ledger: LedgerSnapshot::default(),
            failures: Vec::new(),
        }
    }

    /// Fold one case result into the counts.
    pub fn add(&mut self, result: &CaseResult) {
        self.total += 1;
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failures.push(FailureRow {
                case: result.case.name(),
                input_len: result.input_len,
                input_sha256: result.input_sha256.clone(),
                violations: result.violations.iter().map(ToString::to_string).collect(),
            });
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Render as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Capacity: {} bytes\n", self.capacity));
        out.push_str(&format!(
            "- Cases: {} total, {} passed, {} failed\n",
            self.total, self.passed, self.failed
        ));
        out.push_str(&format!(
            "- Copies: {} complete, {} truncated, {} bytes written, {} bytes dropped\n\n",
            self.ledger.complete,
            self.ledger.truncated,
            self.ledger.bytes_written,
            self.ledger.bytes_dropped
        ));

        if self.failures.is_empty() {
            out.push_str("All safety invariants held.\n");
            return out;
        }

        out.push_str("## Failures\n\n");
        out.push_str("| Case | Input len | Violations |\n");
        out.push_str("|------|-----------|------------|\n");
        for row in &self.failures {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                row.case,
                row.input_len,
                row.violations.join("; ")
            ));
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Report over a fixture verification run.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub title: String,
    pub timestamp: String,
    pub summary: VerificationSummary,
}

impl VerificationReport {
    /// Render as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!(
            "- Total: {}, Passed: {}, Failed: {}\n\n",
            self.summary.total, self.summary.passed, self.summary.failed
        ));
        out.push_str("| Family | Case | Capacity | Expected | Actual | Status |\n");
        out.push_str("|--------|------|----------|----------|--------|--------|\n");
        for r in &self.summary.results {
            out.push_str(&format!(
                "| {} | {} | {} | `{}` | `{}` | {} |\n",
                r.family,
                r.case_name,
                r.capacity,
                r.expected,
                r.actual,
                if r.passed { "PASS" } else { "FAIL" }
            ));
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
