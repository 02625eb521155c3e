//! Fixture execution engine.

use boundcopy_core::{BoundedBuffer, CopyOutcome};

use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// Runs fixture sets against [`BoundedBuffer`] and collects verification results.
pub struct TestRunner {
    /// Name of the verification campaign.
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run every case in a set. An invalid capacity fails each case rather
    /// than aborting the batch.
    #[must_use]
    pub fn run(&self, set: &FixtureSet) -> Vec<VerificationResult> {
        set.cases
            .iter()
            .map(|case| {
                let expected = render(&case.expected.copy, case.expected.length);
                let (actual, diff) = execute_case(case, set.capacity);
                VerificationResult {
                    family: set.family.clone(),
                    case_name: format!("{} [{}]", case.name, self.campaign),
                    capacity: set.capacity,
                    passed: actual == expected && diff.is_none(),
                    diff: diff.or_else(|| {
                        (actual != expected).then(|| format!("- {expected}\n+ {actual}"))
                    }),
                    expected,
                    actual,
                }
            })
            .collect()
    }
}

fn render(copy: &CopyOutcome, length: usize) -> String {
    format!("{copy} len={length}")
}

// Returns the rendered outcome and a note when the contents are wrong.
fn execute_case(case: &FixtureCase, capacity: usize) -> (String, Option<String>) {
    let mut buffer = match BoundedBuffer::new(capacity) {
        Ok(buffer) => buffer,
        Err(err) => return (format!("error:{err}"), None),
    };
    let input = match case.input.generate() {
        Ok(input) => input,
        Err(err) => return (format!("error:{err}"), None),
    };
    let copy = buffer.write_bounded(&input);
    let actual = render(&copy, buffer.len());

    let view = buffer.as_slice();
    let note = view
        .iter()
        .zip(&input)
        .position(|(a, b)| a != b)
        .map(|offset| format!("content differs from input at byte {offset}"));
    (actual, note)
}
