//! Truncation ledger.
//!
//! Counts copy outcomes so a caller can report how much data bounded copies
//! discarded without threading counters through every call site.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::buffer::CopyOutcome;

/// Running totals of bounded copy outcomes.
#[derive(Debug, Default)]
pub struct TruncationLedger {
    /// Copies recorded.
    pub writes: AtomicU64,
    /// Copies where every byte fit.
    pub complete: AtomicU64,
    /// Copies that dropped bytes.
    pub truncated: AtomicU64,
    /// Bytes that landed in a destination.
    pub bytes_written: AtomicU64,
    /// Bytes that did not fit.
    pub bytes_dropped: AtomicU64,
}

impl TruncationLedger {
    /// Create a ledger with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            writes: AtomicU64::new(0),
            complete: AtomicU64::new(0),
            truncated: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            bytes_dropped: AtomicU64::new(0),
        }
    }

    /// Record the outcome of copying `source_len` bytes.
    pub fn record(&self, outcome: &CopyOutcome, source_len: usize) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        match outcome {
            CopyOutcome::Complete => {
                self.complete.fetch_add(1, Ordering::Relaxed);
                self.bytes_written
                    .fetch_add(source_len as u64, Ordering::Relaxed);
            }
            CopyOutcome::Truncated { written, dropped } => {
                self.truncated.fetch_add(1, Ordering::Relaxed);
                self.bytes_written
                    .fetch_add(*written as u64, Ordering::Relaxed);
                self.bytes_dropped
                    .fetch_add(*dropped as u64, Ordering::Relaxed);
            }
        }
    }

    /// Point-in-time copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            writes: self.writes.load(Ordering::Relaxed),
            complete: self.complete.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_dropped: self.bytes_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value view of a [`TruncationLedger`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub writes: u64,
    pub complete: u64,
    pub truncated: u64,
    pub bytes_written: u64,
    pub bytes_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_complete_and_truncated() {
        let ledger = TruncationLedger::new();
        ledger.record(&CopyOutcome::Complete, 10);
        ledger.record(
            &CopyOutcome::Truncated {
                written: 100,
                dropped: 9_900,
            },
            10_000,
        );
        ledger.record(
            &CopyOutcome::Truncated {
                written: 100,
                dropped: 1,
            },
            101,
        );

        let snap = ledger.snapshot();
        assert_eq!(snap.writes, 3);
        assert_eq!(snap.complete, 1);
        assert_eq!(snap.truncated, 2);
        assert_eq!(snap.bytes_written, 210);
        assert_eq!(snap.bytes_dropped, 9_901);
    }

    #[test]
    fn fresh_ledger_is_zero() {
        assert_eq!(TruncationLedger::new().snapshot(), LedgerSnapshot::default());
    }
}
