use thiserror::Error;

use crate::types::MemoryId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    #[error("Memory not found: {0}")]
    NotFound(MemoryId),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
