//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

use boundcopy_core::BufferError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("no fixture JSON files found in {}", dir.display())]
    NoFixtures { dir: PathBuf },
}
