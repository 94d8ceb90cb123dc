//! Core error types

use thiserror::Error;

use crate::MAX_NUM_BITS;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Database must be square: row {row} has {len} entries, expected {expected}")]
    NonSquareDatabase {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Database dimension must be at least 1")]
    EmptyDatabase,

    #[error("Invalid bit width {0}: must be in 1..={max}", max = MAX_NUM_BITS)]
    InvalidBitWidth(u32),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Secret coefficient {value} at position {position} is outside [1, 100)")]
    SecretOutOfRange { position: usize, value: u32 },

    #[error("Flat index {index} out of range for a {n}x{n} database")]
    IndexOutOfRange { index: usize, n: usize },

    #[error("Coordinate ({row}, {col}) out of range for a {n}x{n} database")]
    CoordinateOutOfRange { row: usize, col: usize, n: usize },

    #[error("Row {0} requested more than once")]
    DuplicateRow(usize),

    #[error("Row {0} has no requested coordinate")]
    MissingRow(usize),

    #[error("At least two decoded vectors are required, got {0}")]
    TooFewServers(usize),

    #[error("Entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
