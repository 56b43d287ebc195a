//! Error types for fxcalc

use thiserror::Error;

/// Main error type for fxcalc
#[derive(Error, Debug)]
pub enum FxCalcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Rate fetch failed: {0}")]
    RateFetch(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for fxcalc operations
pub type Result<T> = std::result::Result<T, FxCalcError>;
