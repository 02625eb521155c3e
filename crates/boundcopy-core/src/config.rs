//! Capacity configuration.
//!
//! The buffer capacity used by tooling is resolved in this order:
//! - an explicit value (for example a CLI flag),
//! - the `BOUNDCOPY_CAPACITY` environment variable,
//! - [`DEFAULT_CAPACITY`] (100 bytes).
//!
//! Environment values accept decimal or `0x` hex and may contain `_` separators.

use thiserror::Error;

use crate::buffer::{Capacity, DEFAULT_CAPACITY};
use crate::error::BufferError;

/// Environment variable overriding the default capacity.
pub const CAPACITY_ENV: &str = "BOUNDCOPY_CAPACITY";

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not an unsigned integer")]
    Unparseable { var: &'static str, value: String },
    #[error(transparent)]
    Capacity(#[from] BufferError),
}

/// Parse a capacity literal: decimal or `0x` hex, `_` separators allowed.
#[must_use]
pub fn parse_capacity_literal(raw: &str) -> Option<usize> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '_').collect();
    if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        usize::from_str_radix(hex, 16).ok()
    } else {
        cleaned.parse().ok()
    }
}

fn resolve_from(
    explicit: Option<usize>,
    env_value: Option<String>,
) -> Result<Capacity, ConfigError> {
    if let Some(requested) = explicit {
        return Ok(Capacity::new(requested)?);
    }
    match env_value {
        Some(raw) => {
            let requested = parse_capacity_literal(&raw).ok_or(ConfigError::Unparseable {
                var: CAPACITY_ENV,
                value: raw,
            })?;
            Ok(Capacity::new(requested)?)
        }
        None => Ok(Capacity::new(DEFAULT_CAPACITY)?),
    }
}

/// Resolve the capacity to use, consulting `BOUNDCOPY_CAPACITY` when no
/// explicit value is given.
pub fn resolve_capacity(explicit: Option<usize>) -> Result<Capacity, ConfigError> {
    resolve_from(explicit, std::env::var(CAPACITY_ENV).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literals() {
        assert_eq!(parse_capacity_literal("100"), Some(100));
        assert_eq!(parse_capacity_literal(" 4_096 "), Some(4096));
        assert_eq!(parse_capacity_literal("0x40"), Some(64));
        assert_eq!(parse_capacity_literal("0XFF"), Some(255));
        assert_eq!(parse_capacity_literal("-1"), None);
        assert_eq!(parse_capacity_literal("lots"), None);
    }

    #[test]
    fn explicit_wins_over_env() {
        let cap = resolve_from(Some(32), Some("64".to_string())).unwrap();
        assert_eq!(cap.get(), 32);
    }

    #[test]
    fn env_used_when_no_explicit() {
        let cap = resolve_from(None, Some("0x80".to_string())).unwrap();
        assert_eq!(cap.get(), 128);
    }

    #[test]
    fn default_when_nothing_set() {
        assert_eq!(resolve_from(None, None).unwrap().get(), DEFAULT_CAPACITY);
    }

    #[test]
    fn zero_is_invalid_capacity() {
        assert_eq!(
            resolve_from(Some(0), None).unwrap_err(),
            ConfigError::Capacity(BufferError::InvalidCapacity { requested: 0 })
        );
        assert!(matches!(
            resolve_from(None, Some("0".to_string())),
            Err(ConfigError::Capacity(_))
        ));
    }

    #[test]
    fn garbage_env_is_reported() {
        let err = resolve_from(None, Some("big".to_string())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "BOUNDCOPY_CAPACITY=\"big\" is not an unsigned integer"
        );
    }
}
