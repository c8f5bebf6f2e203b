//! Error taxonomy shared by every algorithm, structure and facade.

use thiserror::Error;

/// Failures surfaced by sorting, searching and dispatch operations.
///
/// Individual algorithms never retry or recover: the first failure is
/// returned to the caller. Only the benchmark facades catch errors, one
/// algorithm at a time, so a sweep can continue past a broken entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input or an option value cannot be processed (non-finite floats,
    /// radix base below 2, invalid configuration values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A radix variant was asked to sort elements that have no digit representation.
    #[error("{algorithm} does not support element type: {detail}")]
    UnsupportedElementType {
        algorithm: &'static str,
        detail: String,
    },

    /// A facade was given a name it does not know.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    /// The comparator panicked or produced a non-numeric (NaN) result.
    #[error("comparator fault: {0}")]
    ComparatorFault(String),
}

pub type Result<T> = std::result::Result<T, Error>;
