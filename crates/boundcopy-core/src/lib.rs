//! Bounded byte-buffer primitive.
//!
//! Replaces unchecked `strcpy`-style copies into fixed storage with a copy
//! whose write length is clamped to the destination capacity. Overflow is
//! reported as [`CopyOutcome::Truncated`] instead of becoming memory
//! corruption.

pub mod buffer;
pub mod config;
pub mod error;
pub mod ledger;

pub use buffer::{BoundedBuffer, Capacity, CopyOutcome, DEFAULT_CAPACITY, bounded_copy};
pub use config::{CAPACITY_ENV, ConfigError, resolve_capacity};
pub use error::BufferError;
pub use ledger::{LedgerSnapshot, TruncationLedger};
