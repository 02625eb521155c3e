// matrix_test.rs
// Runs the full adversarial matrix against BoundedBuffer at the legacy program's
// capacity and checks restartability of the lazy run.

use boundcopy_core::{CopyOutcome, DEFAULT_CAPACITY};
use boundcopy_harness::{CaseKind, CaseResult, CopyHarness, MatrixRun, run_matrix};

fn drain(run: MatrixRun) -> Vec<CaseResult> {
    run.collect::<Result<_, _>>()
        .expect("matrix inputs allocate at small capacities")
}

fn find(results: &[CaseResult], case: CaseKind) -> &CaseResult {
    results
        .iter()
        .find(|r| r.case == case)
        .unwrap_or_else(|| panic!("missing case {case}"))
}

#[test]
fn every_case_passes_at_capacity_100() {
    let results = drain(run_matrix(DEFAULT_CAPACITY).unwrap());
    assert_eq!(results.len(), 7 + 2 * DEFAULT_CAPACITY);
    let failures: Vec<_> = results.iter().filter(|r| !r.passed()).collect();
    assert!(failures.is_empty(), "{failures:#?}");
    assert!(results.iter().all(|r| r.length <= r.capacity));
}

#[test]
fn boundary_outcomes_at_capacity_100() {
    let results = drain(run_matrix(100).unwrap());

    assert_eq!(find(&results, CaseKind::Empty).outcome, CopyOutcome::Complete);
    assert_eq!(find(&results, CaseKind::BelowCapacity).length, 99);
    assert_eq!(find(&results, CaseKind::ExactFit).outcome, CopyOutcome::Complete);
    assert_eq!(
        find(&results, CaseKind::OneOver).outcome,
        CopyOutcome::Truncated {
            written: 100,
            dropped: 1
        }
    );
    let massive = find(&results, CaseKind::MassivelyOver);
    assert_eq!(massive.input_len, 100_000);
    assert_eq!(
        massive.outcome,
        CopyOutcome::Truncated {
            written: 100,
            dropped: 99_900
        }
    );
    assert_eq!(massive.length, 100);

    let nul = find(&results, CaseKind::EmbeddedNul { position: 50 });
    assert_eq!(
        nul.outcome,
        CopyOutcome::Truncated {
            written: 100,
            dropped: 100
        }
    );
    assert_eq!(find(&results, CaseKind::AllNul).length, 100);
    assert_eq!(find(&results, CaseKind::NonUtf8).length, 100);
}

#[test]
fn embedded_nul_covers_every_position() {
    let positions: Vec<usize> = drain(run_matrix(10).unwrap())
        .into_iter()
        .filter_map(|r| match r.case {
            CaseKind::EmbeddedNul { position } => Some(position),
            _ => None,
        })
        .collect();
    assert_eq!(positions, (0..20).collect::<Vec<_>>());
}

#[test]
fn run_is_restartable() {
    let harness = CopyHarness::new(16).unwrap();
    let first = drain(harness.run_matrix());
    let second = drain(harness.run_matrix());
    assert_eq!(first, second);

    let mut run = harness.run_matrix();
    let _ = run.by_ref().take(5).count();
    let resumed = run.clone();
    assert_eq!(drain(run), drain(resumed));
}

#[test]
fn exhausted_run_stays_exhausted() {
    let mut run = run_matrix(1).unwrap();
    assert_eq!(run.by_ref().count(), CaseKind::count(1));
    assert!(run.next().is_none());
    assert!(run.next().is_none());
}

#[test]
fn digests_distinguish_inputs() {
    let results = drain(run_matrix(4).unwrap());
    let mut digests: Vec<_> = results.iter().map(|r| r.input_sha256.as_str()).collect();
    digests.sort_unstable();
    digests.dedup();
    assert_eq!(digests.len(), results.len());
}
