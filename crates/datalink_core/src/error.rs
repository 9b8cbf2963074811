//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Not found")]
    NotFound,

    #[error("No valid input: no accepted files and no text were provided")]
    NoValidInput,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl From<tempfile::PersistError> for AppError {
    fn from(value: tempfile::PersistError) -> Self {
        Self::Io(value.error)
    }
}
