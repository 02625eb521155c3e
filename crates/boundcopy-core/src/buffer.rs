//! Fixed-capacity byte storage with clamped writes.
//!
//! A [`BoundedBuffer`] owns exactly `capacity` bytes, allocated once at
//! construction. Writes copy at most `capacity` bytes and report any excess as
//! [`CopyOutcome::Truncated`], so an oversized source is a value the caller
//! must inspect rather than an out-of-bounds write.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::BufferError;

/// Capacity of the stack buffer in the program this primitive replaces.
pub const DEFAULT_CAPACITY: usize = 100;

/// A validated, strictly positive buffer capacity in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validate a requested capacity.
    pub fn new(requested: usize) -> Result<Self, BufferError> {
        NonZeroUsize::new(requested)
            .map(Self)
            .ok_or(BufferError::InvalidCapacity { requested })
    }

    /// The capacity in bytes.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(DEFAULT_CAPACITY - 1))
    }
}

impl TryFrom<usize> for Capacity {
    type Error = BufferError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a bounded copy.
///
/// There is no variant for memory corruption: an oversized source can only
/// ever produce `Truncated`.
#[must_use = "a truncated copy silently loses data unless the outcome is checked"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum CopyOutcome {
    /// Every source byte fit in the destination.
    Complete,
    /// The source exceeded capacity. The destination holds the first
    /// `written` bytes and `dropped` trailing bytes were discarded.
    Truncated { written: usize, dropped: usize },
}

impl CopyOutcome {
    /// Classify a copy of `source_len` bytes into `capacity` bytes of storage.
    pub const fn classify(source_len: usize, capacity: usize) -> Self {
        if source_len <= capacity {
            Self::Complete
        } else {
            Self::Truncated {
                written: capacity,
                dropped: source_len - capacity,
            }
        }
    }

    /// Returns true if source bytes were dropped.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Number of source bytes that did not fit.
    #[must_use]
    pub const fn bytes_dropped(&self) -> usize {
        match self {
            Self::Complete => 0,
            Self::Truncated { dropped, .. } => *dropped,
        }
    }

    /// Stable variant name used in logs and fixtures.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Truncated { .. } => "Truncated",
        }
    }
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => f.write_str("Complete"),
            Self::Truncated { written, dropped } => write!(f, "Truncated({written}, {dropped})"),
        }
    }
}

/// Copies `min(src.len(), dest.len())` bytes from `src` into the front of `dest`.
///
/// This is the checked replacement for `strcpy`: no terminator is consulted,
/// embedded zero bytes are copied verbatim, and nothing past `dest.len()` is
/// ever written.
pub fn bounded_copy(dest: &mut [u8], src: &[u8]) -> CopyOutcome {
    let count = src.len().min(dest.len());
    dest[..count].copy_from_slice(&src[..count]);
    CopyOutcome::classify(src.len(), dest.len())
}

/// Fixed-capacity byte container whose writes never exceed its storage.
#[derive(Clone)]
pub struct BoundedBuffer {
    storage: Box<[u8]>,
    len: usize,
}

impl BoundedBuffer {
    /// Allocate a zero-filled buffer of `capacity` bytes.
    ///
    /// Fails with [`BufferError::InvalidCapacity`] when `capacity` is zero and
    /// with [`BufferError::AllocationFailed`] when the storage cannot be
    /// reserved.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Capacity::new(capacity).and_then(Self::with_capacity)
    }

    /// Allocate a zero-filled buffer of an already validated capacity.
    pub fn with_capacity(capacity: Capacity) -> Result<Self, BufferError> {
        let requested = capacity.get();
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(requested)
            .map_err(|_| BufferError::AllocationFailed { requested })?;
        storage.resize(requested, 0_u8);
        Ok(Self {
            storage: storage.into_boxed_slice(),
            len: 0,
        })
    }

    /// Replace the contents with the first `min(source.len(), capacity)` bytes
    /// of `source`.
    ///
    /// Only `storage[..len]` and `len` are touched; no allocation happens here.
    pub fn write_bounded(&mut self, source: &[u8]) -> CopyOutcome {
        let outcome = bounded_copy(&mut self.storage, source);
        self.len = source.len().min(self.storage.len());
        debug_assert!(self.len <= self.storage.len());
        outcome
    }

    /// View of the occupied bytes, `storage[..len]`.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Fixed capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of occupied bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.storage.len()
    }

    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.storage.len() - self.len
    }

    /// Forget the current contents. Storage bytes are left as they are but
    /// are no longer reachable through [`as_slice`](Self::as_slice).
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl AsRef<[u8]> for BoundedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

// Stale bytes past `len` take no part in equality.
impl PartialEq for BoundedBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.as_slice() == other.as_slice()
    }
}

impl Eq for BoundedBuffer {}

// Stale bytes past `len` stay out of Debug output.
impl fmt::Debug for BoundedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("data", &self.as_slice())
            .finish()
    }
}
