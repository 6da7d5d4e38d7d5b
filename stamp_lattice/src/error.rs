//! Error types for stamp operations.
//!
//! Lattice violations (mismatched kinds or widths reaching a binary operation)
//! are programming errors in the caller; they surface as [`StampError`] so the
//! compilation unit can be aborted instead of continuing with an unsound stamp.
//! Empty or imprecise results are data, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by stamp construction, lattice operations and operator folding.
#[derive(Debug, Error)]
pub enum StampError {
    #[error("incompatible stamps for {op}: {left} and {right}")]
    IncompatibleStamps {
        op: &'static str,
        left: String,
        right: String,
    },

    #[error("bit width mismatch in {op}: expected {expected}, found {found}")]
    BitWidthMismatch {
        op: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("unsupported integer width: {0} (expected 1, 8, 16, 32 or 64)")]
    UnsupportedWidth(u32),

    #[error("incompatible constants for {op}: {left} and {right}")]
    IncompatibleConstants {
        op: &'static str,
        left: String,
        right: String,
    },

    #[error("constant {constant} is not compatible with stamp {stamp}")]
    IncompatibleConstant { constant: String, stamp: String },

    #[error("unknown nominal type '{0}'")]
    UnknownType(String),

    #[error("cyclic type hierarchy through '{0}'")]
    CyclicHierarchy(String),

    #[error("invalid stamp configuration: {0}")]
    Config(String),

    #[error("failed to read configuration {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StampError {
    pub(crate) fn incompatible_stamps(
        op: &'static str,
        left: &impl std::fmt::Display,
        right: &impl std::fmt::Display,
    ) -> Self {
        StampError::IncompatibleStamps {
            op,
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub(crate) fn incompatible_constants(
        op: &'static str,
        left: &impl std::fmt::Display,
        right: &impl std::fmt::Display,
    ) -> Self {
        StampError::IncompatibleConstants {
            op,
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Returns true for errors that indicate a caller bug rather than bad input.
    pub fn is_lattice_violation(&self) -> bool {
        matches!(
            self,
            StampError::IncompatibleStamps { .. }
                | StampError::BitWidthMismatch { .. }
                | StampError::UnsupportedWidth(_)
                | StampError::IncompatibleConstants { .. }
                | StampError::IncompatibleConstant { .. }
        )
    }
}

/// Result type for stamp operations.
pub type StampResult<T> = Result<T, StampError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StampError::incompatible_stamps("meet", &"i32", &"f64");
        assert_eq!(err.to_string(), "incompatible stamps for meet: i32 and f64");

        let err = StampError::BitWidthMismatch {
            op: "zero-extend",
            expected: 32,
            found: 8,
        };
        assert_eq!(
            err.to_string(),
            "bit width mismatch in zero-extend: expected 32, found 8"
        );
        assert!(err.is_lattice_violation());
    }

    #[test]
    fn test_config_errors_are_not_lattice_violations() {
        let err = StampError::Config("bad key".to_string());
        assert!(!err.is_lattice_violation());
        assert_eq!(err.to_string(), "invalid stamp configuration: bad key");
    }

    #[test]
    fn test_cyclic_hierarchy_message() {
        let err = StampError::CyclicHierarchy("A".to_string());
        assert_eq!(err.to_string(), "cyclic type hierarchy through 'A'");
        assert!(!err.is_lattice_violation());
    }
}
