//! Journal errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Broken chain at sequence {sequence}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at sequence {sequence}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },
}
