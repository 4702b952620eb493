//! Errors raised while parsing the source datasets.

use thiserror::Error;

/// Parse failures in either dataset
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Table with summary {summary:?} not found")]
    TableNotFound { summary: String },

    #[error("Line {line}, column {column}: invalid integer {value:?}")]
    InvalidInteger {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("Line {line}, column {column}: invalid number {value:?}")]
    InvalidFloat {
        line: usize,
        column: usize,
        value: String,
    },
}

/// Result type for dataset parsing
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a trimmed integer field
pub(crate) fn parse_int(value: &str, line: usize, column: usize) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidInteger {
            line,
            column,
            value: value.to_string(),
        })
}

/// Parse a trimmed floating-point field
pub(crate) fn parse_float(value: &str, line: usize, column: usize) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidFloat {
            line,
            column,
            value: value.to_string(),
        })
}
