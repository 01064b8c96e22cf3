use thiserror::Error;

/// Malformed document text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("expected a scalar, got {0}")]
    NotScalar(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
