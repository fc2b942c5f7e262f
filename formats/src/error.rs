use thiserror::Error;

use crate::FIELDS;

/// Malformed position record.  `line` is 1-based, `row` is the raw record as read.
///
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {} fields, got {found} in '{row}'", FIELDS)]
    BadArity { line: u64, found: usize, row: String },
    #[error("line {line}: invalid {field} '{value}' in '{row}'")]
    BadField {
        line: u64,
        field: &'static str,
        value: String,
        row: String,
    },
    #[error("line {line}: estimated flag must be 0 or 1, got '{value}' in '{row}'")]
    BadFlag { line: u64, value: String, row: String },
    #[error("line {line}: timestamp {value} out of range in '{row}'")]
    BadTimestamp { line: u64, value: f64, row: String },
    #[error("unreadable input: {0}")]
    Csv(#[from] csv::Error),
}

impl ParseError {
    /// Line of the offending record, if we got that far.
    ///
    pub fn line(&self) -> Option<u64> {
        match self {
            ParseError::BadArity { line, .. }
            | ParseError::BadField { line, .. }
            | ParseError::BadFlag { line, .. }
            | ParseError::BadTimestamp { line, .. } => Some(*line),
            ParseError::Csv(e) => e.position().map(|p| p.line()),
        }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no position sample, nothing to segment")]
    Empty,
}
