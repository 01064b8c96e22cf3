//! Error types for the diff crate.

use std::fmt;

use leafdiff_types::{ParseError, Path};

/// Which input document an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Old,
    Current,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::Current => f.write_str("current"),
        }
    }
}

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// One of the input documents is not well-formed.
    #[error("failed to parse {side} document: {source}")]
    Parse {
        side: Side,
        #[source]
        source: ParseError,
    },

    /// The trees nest deeper than the configured limit.
    #[error("nesting depth limit {limit} exceeded at path {path:?}")]
    DepthExceeded { path: Path, limit: usize },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
