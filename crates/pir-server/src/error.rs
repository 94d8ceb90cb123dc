//! Server error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("PIR error: {0}")]
    Pir(#[from] pir_core::Error),

    #[error("Fault row {row} out of range for an answer of {len} rows")]
    FaultRowOutOfRange { row: usize, len: usize },

    #[error("Cannot place {count} faults in {rows} rows")]
    TooManyFaults { count: usize, rows: usize },

    #[error("Fault offset for row {0} is zero")]
    ZeroOffset(usize),
}

pub type Result<T> = std::result::Result<T, ServerError>;
