//! Fixture loading.
//!
//! A fixture set pins the expected outcome of specific inputs at one
//! capacity, so boundary behavior is checked against data that lives outside
//! the code under test.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use boundcopy_core::{BufferError, CopyOutcome};

use crate::error::HarnessError;

fn default_fill() -> u8 {
    b'A'
}

/// Recipe for an input byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Total input length.
    pub len: usize,
    /// Byte repeated across the input.
    #[serde(default = "default_fill")]
    pub fill: u8,
    /// Position overwritten with a zero byte, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nul_at: Option<usize>,
}

impl InputSpec {
    /// Materialize the input bytes.
    pub fn generate(&self) -> Result<Vec<u8>, BufferError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(self.len)
            .map_err(|_| BufferError::AllocationFailed {
                requested: self.len,
            })?;
        bytes.resize(self.len, self.fill);
        if let Some(byte) = self.nul_at.and_then(|pos| bytes.get_mut(pos)) {
            *byte = 0;
        }
        Ok(bytes)
    }
}

/// Expected result of writing the input into a fresh buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedCopy {
    pub copy: CopyOutcome,
    pub length: usize,
}

/// A single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    pub input: InputSpec,
    pub expected: ExpectedCopy,
}

/// A collection of fixture cases sharing one capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Grouping label, e.g. `boundary`.
    pub family: String,
    /// Buffer capacity every case is run at.
    pub capacity: usize,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// Sorted `*.json` paths directly inside `dir`.
pub fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}
