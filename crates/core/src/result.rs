// crates/core/src/result.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxcalError {
    #[error("NLU error: {0}")]
    Nlu(String),

    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("Calendar service error: {0}")]
    Calendar(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type VoxcalResult<T> = Result<T, VoxcalError>;
