//! Error taxonomy for buffer construction.
//!
//! Truncation is deliberately absent here: it is a [`CopyOutcome`](crate::CopyOutcome),
//! not an error.

use thiserror::Error;

/// Errors raised while constructing a [`BoundedBuffer`](crate::BoundedBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Capacity must be a positive number of bytes.
    #[error("invalid capacity {requested}: capacity must be at least 1 byte")]
    InvalidCapacity { requested: usize },
    /// Storage of the requested size could not be reserved.
    #[error("cannot allocate {requested} bytes of buffer storage")]
    AllocationFailed { requested: usize },
}
