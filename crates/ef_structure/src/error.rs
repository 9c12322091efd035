use std::fmt;

/// Errors raised while interpreting a dot-bracket string or assembling a
/// `SecondaryStructure` from its parallel per-position strings.
#[derive(Debug)]
pub enum StructureError {
    UnmatchedOpen(usize),                // '(' at this position was never closed
    UnmatchedClose(usize),               // ')' at this position has no matching '('
    InvalidToken(String, String, usize), // invalid char, source, position
    LengthMismatch { field: &'static str, found: usize, expected: usize },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::UnmatchedOpen(i) => {
                write!(f, "Unmatched '(' at position {}", i)
            }
            StructureError::UnmatchedClose(i) => {
                write!(f, "Unmatched ')' at position {}", i)
            }
            StructureError::InvalidToken(tok, src, i) => {
                write!(f, "Invalid {} in {} at position {}", tok, src, i)
            }
            StructureError::LengthMismatch { field, found, expected } => {
                write!(f, "{} has length {}, expected {}", field, found, expected)
            }
        }
    }
}

impl std::error::Error for StructureError {}

/// Errors raised by the bpRNA element-record state machine.
///
/// Every variant is fatal for the record it occurred in; a pipeline over many
/// records is expected to report the error and continue with the next record.
#[derive(Debug)]
pub enum RecordError {
    UnknownTag(String),
    TokenCount { tag: String, expected: &'static str, found: usize, line: String },
    BadPositionPair(String),
    BadNucleotidePair(String),
    BadPairCount(String),
    DanglingInterior(String),
    MismatchedInterior(String, String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::UnknownTag(tag) => {
                write!(f, "Unknown element tag '{}'", tag)
            }
            RecordError::TokenCount { tag, expected, found, line } => {
                write!(f, "Element line '{}' ({}) has {} tokens, expected {}", line, tag, found, expected)
            }
            RecordError::BadPositionPair(tok) => {
                write!(f, "Token '{}' does not contain a position pair", tok)
            }
            RecordError::BadNucleotidePair(tok) => {
                write!(f, "Token '{}' does not contain a nucleotide pair", tok)
            }
            RecordError::BadPairCount(tok) => {
                write!(f, "Token '{}' does not contain a base-pair count", tok)
            }
            RecordError::DanglingInterior(raw) => {
                write!(f, "Interior loop half '{}' has no matching 3' half", raw)
            }
            RecordError::MismatchedInterior(left, right) => {
                write!(f, "Interior loop halves '{}' and '{}' have different ordinals", left, right)
            }
        }
    }
}

impl std::error::Error for RecordError {}
