//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Core error: {0}")]
    Core(#[from] pir_core::Error),

    #[error("Server error: {0}")]
    Server(#[from] pir_server::ServerError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
