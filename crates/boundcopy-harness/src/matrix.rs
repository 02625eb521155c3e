//! Adversarial copy matrix.
//!
//! [`CopyHarness::run_matrix`] drives a deterministic set of boundary inputs
//! through a fresh [`BoundedBuffer`] per case and checks the safety invariants
//! after every write:
//!
//! 1. `length <= capacity`
//! 2. the [`CopyOutcome`] classification matches the input/capacity relation
//! 3. `as_slice().len() == length == min(input_len, capacity)`
//! 4. the view is the input's prefix, byte for byte
//! 5. a second fresh buffer fed the same input agrees
//!
//! Inputs are generated lazily, one case at a time, and a failing case never
//! stops the run. Allocation is fallible throughout: a capacity whose inputs
//! or buffers cannot be reserved yields [`BufferError::AllocationFailed`]
//! items instead of aborting.
//!
//! The copy target is pluggable through [`CopyTarget`] so faulty copies can be
//! injected and shown to be caught.

use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use boundcopy_core::{BoundedBuffer, BufferError, Capacity, CopyOutcome};

/// Inputs longer than capacity by this factor exercise the "massively over" case.
pub const MASSIVE_FACTOR: usize = 1000;

/// Number of fixed (non position-indexed) cases.
const FIXED_CASES: usize = 7;

/// A destination the matrix can drive.
pub trait CopyTarget {
    /// Copy `source` into the target, reporting truncation.
    fn write_bounded(&mut self, source: &[u8]) -> CopyOutcome;
    /// Occupied bytes.
    fn as_slice(&self) -> &[u8];
    /// Recorded occupied length.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CopyTarget for BoundedBuffer {
    fn write_bounded(&mut self, source: &[u8]) -> CopyOutcome {
        BoundedBuffer::write_bounded(self, source)
    }

    fn as_slice(&self) -> &[u8] {
        BoundedBuffer::as_slice(self)
    }

    fn len(&self) -> usize {
        BoundedBuffer::len(self)
    }
}

/// One adversarial input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CaseKind {
    /// Zero-length input.
    Empty,
    /// `capacity - 1` bytes.
    BelowCapacity,
    /// Exactly `capacity` bytes.
    ExactFit,
    /// `capacity + 1` bytes.
    OneOver,
    /// `capacity * MASSIVE_FACTOR` bytes.
    MassivelyOver,
    /// `2 * capacity` non-zero bytes with a single zero byte at `position`.
    EmbeddedNul { position: usize },
    /// `2 * capacity` zero bytes.
    AllNul,
    /// `capacity + 1` bytes from `0x80..=0xFF`, never valid UTF-8.
    NonUtf8,
}

impl CaseKind {
    /// Total number of cases the matrix runs for `capacity`.
    #[must_use]
    pub fn count(capacity: usize) -> usize {
        FIXED_CASES.saturating_add(capacity.saturating_mul(2))
    }

    /// The `index`-th case of the matrix, or `None` past the end.
    #[must_use]
    pub fn at(index: usize, capacity: usize) -> Option<Self> {
        let embedded = capacity.saturating_mul(2);
        let case = match index {
            0 => Self::Empty,
            1 => Self::BelowCapacity,
            2 => Self::ExactFit,
            3 => Self::OneOver,
            4 => Self::MassivelyOver,
            i if i - 5 < embedded => Self::EmbeddedNul { position: i - 5 },
            i if i - 5 == embedded => Self::AllNul,
            i if i - 5 == embedded + 1 => Self::NonUtf8,
            _ => return None,
        };
        Some(case)
    }

    /// Length of the input this case produces.
    #[must_use]
    pub fn input_len(&self, capacity: usize) -> usize {
        match self {
            Self::Empty => 0,
            Self::BelowCapacity => capacity.saturating_sub(1),
            Self::ExactFit => capacity,
            Self::OneOver | Self::NonUtf8 => capacity.saturating_add(1),
            Self::MassivelyOver => capacity.saturating_mul(MASSIVE_FACTOR),
            Self::EmbeddedNul { .. } | Self::AllNul => capacity.saturating_mul(2),
        }
    }

    /// Materialize the input bytes.
    ///
    /// Fails with [`BufferError::AllocationFailed`] when the input cannot be
    /// reserved, which includes lengths that saturated at `usize::MAX`.
    pub fn generate(&self, capacity: usize) -> Result<Vec<u8>, BufferError> {
        let len = self.input_len(capacity);
        let mut bytes = reserve(len)?;
        match self {
            Self::AllNul => bytes.resize(len, 0),
            Self::NonUtf8 => bytes.extend((0..len).map(|i| 0x80 | (i % 0x80) as u8)),
            Self::EmbeddedNul { position } => {
                bytes.extend(printable(len));
                if let Some(byte) = bytes.get_mut(*position) {
                    *byte = 0;
                }
            }
            _ => bytes.extend(printable(len)),
        }
        Ok(bytes)
    }

    /// Stable case name for logs and reports.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Empty => "empty".to_string(),
            Self::BelowCapacity => "below_capacity".to_string(),
            Self::ExactFit => "exact_fit".to_string(),
            Self::OneOver => "one_over".to_string(),
            Self::MassivelyOver => "massively_over".to_string(),
            Self::EmbeddedNul { position } => format!("embedded_nul@{position}"),
            Self::AllNul => "all_nul".to_string(),
            Self::NonUtf8 => "non_utf8".to_string(),
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn reserve(len: usize) -> Result<Vec<u8>, BufferError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| BufferError::AllocationFailed { requested: len })?;
    Ok(bytes)
}

// Non-zero filler so an embedded zero byte is the only terminator candidate.
fn printable(len: usize) -> impl Iterator<Item = u8> {
    (0..len).map(|i| b'A' + (i % 26) as u8)
}

/// A failed invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "check")]
pub enum Violation {
    LengthExceedsCapacity {
        length: usize,
        capacity: usize,
    },
    OutcomeMismatch {
        expected: CopyOutcome,
        actual: CopyOutcome,
    },
    SliceLengthMismatch {
        slice_len: usize,
        length: usize,
        expected: usize,
    },
    ContentMismatch {
        offset: usize,
    },
    NotIdempotent,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthExceedsCapacity { length, capacity } => {
                write!(f, "length {length} exceeds capacity {capacity}")
            }
            Self::OutcomeMismatch { expected, actual } => {
                write!(f, "outcome {actual}, expected {expected}")
            }
            Self::SliceLengthMismatch {
                slice_len,
                length,
                expected,
            } => write!(
                f,
                "slice length {slice_len}, recorded length {length}, expected {expected}"
            ),
            Self::ContentMismatch { offset } => {
                write!(f, "content differs from input prefix at byte {offset}")
            }
            Self::NotIdempotent => f.write_str("second write on a fresh buffer disagreed"),
        }
    }
}

/// Result of one matrix case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: CaseKind,
    pub capacity: usize,
    pub input_len: usize,
    /// Hex SHA-256 of the input bytes.
    pub input_sha256: String,
    pub outcome: CopyOutcome,
    pub length: usize,
    pub violations: Vec<Violation>,
}

impl CaseResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Builds a fresh copy target of the given capacity.
pub type MakeTarget<T> = fn(Capacity) -> Result<T, BufferError>;

/// Run one case against targets built by `make`.
///
/// Only allocation failures are errors; broken invariants are reported as
/// [`Violation`]s in the returned [`CaseResult`].
pub fn evaluate<T: CopyTarget>(
    capacity: Capacity,
    case: CaseKind,
    make: MakeTarget<T>,
) -> Result<CaseResult, BufferError> {
    let cap = capacity.get();
    let input = case.generate(cap)?;
    let expected_len = input.len().min(cap);

    let mut target = make(capacity)?;
    let outcome = target.write_bounded(&input);
    let length = target.len();
    let view = target.as_slice();

    let mut violations = Vec::new();
    if length > cap {
        violations.push(Violation::LengthExceedsCapacity {
            length,
            capacity: cap,
        });
    }

    let expected = CopyOutcome::classify(input.len(), cap);
    if outcome != expected {
        violations.push(Violation::OutcomeMismatch {
            expected,
            actual: outcome,
        });
    }

    if view.len() != length || length != expected_len {
        violations.push(Violation::SliceLengthMismatch {
            slice_len: view.len(),
            length,
            expected: expected_len,
        });
    }

    if let Some(offset) = first_difference(view, &input) {
        violations.push(Violation::ContentMismatch { offset });
    }

    let mut replay = make(capacity)?;
    let replay_outcome = replay.write_bounded(&input);
    if replay_outcome != outcome || replay.len() != length || replay.as_slice() != view {
        violations.push(Violation::NotIdempotent);
    }

    Ok(CaseResult {
        case,
        capacity: cap,
        input_len: input.len(),
        input_sha256: sha256_hex(&input),
        outcome,
        length,
        violations,
    })
}

// Offset where `view` stops being a prefix of `input`.
fn first_difference(view: &[u8], input: &[u8]) -> Option<usize> {
    view.iter()
        .zip(input)
        .position(|(a, b)| a != b)
        .or_else(|| (view.len() > input.len()).then_some(input.len()))
}

/// Drives the adversarial matrix at a fixed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyHarness {
    capacity: Capacity,
}

impl CopyHarness {
    /// Fails with [`BufferError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Capacity::new(capacity).map(Self::with_capacity)
    }

    #[must_use]
    pub const fn with_capacity(capacity: Capacity) -> Self {
        Self { capacity }
    }

    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Lazily evaluate every case against [`BoundedBuffer`].
    #[must_use]
    pub fn run_matrix(&self) -> MatrixRun {
        self.run_matrix_with(BoundedBuffer::with_capacity)
    }

    /// Lazily evaluate every case against targets built by `make`.
    #[must_use]
    pub fn run_matrix_with<T: CopyTarget>(&self, make: MakeTarget<T>) -> MatrixRun<T> {
        MatrixRun {
            capacity: self.capacity,
            next: 0,
            total: CaseKind::count(self.capacity.get()),
            make,
        }
    }
}

/// Build a harness for `capacity` and start its matrix.
pub fn run_matrix(capacity: usize) -> Result<MatrixRun, BufferError> {
    CopyHarness::new(capacity).map(|harness| harness.run_matrix())
}

/// Lazy, finite sequence of [`CaseResult`]s.
///
/// Cloning yields an independent run that resumes from the same position.
/// A case whose input or targets cannot be allocated yields an `Err` and the
/// run moves on to the next case.
pub struct MatrixRun<T = BoundedBuffer> {
    capacity: Capacity,
    next: usize,
    total: usize,
    make: MakeTarget<T>,
}

impl<T> MatrixRun<T> {
    /// Capacity every case in this run is evaluated at.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }
}

impl<T> Clone for MatrixRun<T> {
    fn clone(&self) -> Self {
        Self {
            capacity: self.capacity,
            next: self.next,
            total: self.total,
            make: self.make,
        }
    }
}

impl<T> fmt::Debug for MatrixRun<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixRun")
            .field("capacity", &self.capacity)
            .field("next", &self.next)
            .field("total", &self.total)
            .finish()
    }
}

impl<T: CopyTarget> Iterator for MatrixRun<T> {
    type Item = Result<CaseResult, BufferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let case = CaseKind::at(self.next, self.capacity.get())?;
        self.next += 1;
        Some(evaluate(self.capacity, case, self.make))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<T: CopyTarget> ExactSizeIterator for MatrixRun<T> {}

impl<T: CopyTarget> FusedIterator for MatrixRun<T> {}
