use thiserror::Error;

/// Errors produced by logchain operations.
///
/// Integrity findings (failed verification, chain breaks) are deliberately
/// not represented here — tamper detection is an expected outcome, reported
/// as first-class results by the verification crate, never as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogchainError {
    // --- validation ---
    #[error("server id must not be empty")]
    ServerIdEmpty,

    #[error("server id too long: {actual} bytes (max {max})")]
    ServerIdTooLong { max: usize, actual: usize },

    #[error("description too long: {actual} bytes (max {max})")]
    DescriptionTooLong { max: usize, actual: usize },

    #[error("entry too large: {actual} bytes (max {max})")]
    EntryTooLarge { max: usize, actual: usize },

    #[error("log count must be between 1 and {max}, got {count}")]
    InvalidLogCount { count: u64, max: u64 },

    // --- state ---
    #[error("server not found: {id}")]
    ServerNotFound { id: String },

    #[error("server already registered: {id}")]
    ServerExists { id: String },

    #[error("server is not active")]
    ServerInactive,

    #[error("server is still active")]
    ServerStillActive,

    #[error("no audit trail exists for this server")]
    TrailNotFound,

    #[error("entry {index} not found")]
    EntryNotFound { index: u64 },

    #[error("batch id must be sequential: next is {expected}, got {supplied}")]
    InvalidBatchSequence { expected: u64, supplied: u64 },

    #[error("insufficient entries to anchor: {available} unanchored, {requested} requested")]
    InsufficientEntries { available: u64, requested: u64 },

    #[error("anchor window not contiguous: expected entry {expected}, found {found}")]
    WindowNotContiguous { expected: u64, found: u64 },

    #[error("entry belongs to a different server")]
    EntryServerMismatch,

    #[error("logchain state lock poisoned")]
    LockPoisoned,

    // --- authorization ---
    #[error("only the server authority can perform this action")]
    Unauthorized,
}

/// Coarse classification of an error, driving caller retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller-supplied input violates a static constraint. Recoverable by
    /// correcting the input; never retried as-is.
    Validation,
    /// Operation is inconsistent with current record state. Caller must
    /// re-fetch state before retrying.
    State,
    /// Caller identity does not match the record authority. Never retried.
    Authorization,
}

impl LogchainError {
    /// Which class of the error taxonomy this error belongs to.
    pub fn class(&self) -> ErrorClass {
        use LogchainError::*;
        match self {
            ServerIdEmpty
            | ServerIdTooLong { .. }
            | DescriptionTooLong { .. }
            | EntryTooLarge { .. }
            | InvalidLogCount { .. } => ErrorClass::Validation,
            ServerNotFound { .. }
            | ServerExists { .. }
            | ServerInactive
            | ServerStillActive
            | TrailNotFound
            | EntryNotFound { .. }
            | InvalidBatchSequence { .. }
            | InsufficientEntries { .. }
            | WindowNotContiguous { .. }
            | EntryServerMismatch
            | LockPoisoned => ErrorClass::State,
            Unauthorized => ErrorClass::Authorization,
        }
    }
}
