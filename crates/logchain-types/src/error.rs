use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("server id must not be empty")]
    ServerIdEmpty,

    #[error("server id too long: {actual} bytes (max {max})")]
    ServerIdTooLong { max: usize, actual: usize },
}
