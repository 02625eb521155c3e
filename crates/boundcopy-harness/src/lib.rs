//! Adversarial copy harness for boundcopy.
//!
//! This crate provides:
//! - Copy matrix: drive boundary inputs through fresh buffers and check the
//!   safety invariants after every write
//! - Fault injection: run the same matrix against any [`CopyTarget`]
//! - Fixture verify: compare buffer behavior against pinned JSON expectations
//! - Structured JSONL logging and Markdown/JSON reports

#![forbid(unsafe_code)]

pub mod error;
pub mod fixtures;
pub mod matrix;
pub mod report;
pub mod runner;
pub mod session;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use matrix::{
    CaseKind, CaseResult, CopyHarness, CopyTarget, MakeTarget, MatrixRun, Violation,
    run_matrix,
};
pub use report::{MatrixReport, VerificationReport};
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
