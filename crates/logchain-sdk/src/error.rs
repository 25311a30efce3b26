use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdkError {
    #[error("invalid input: {0}")]
    Input(#[from] logchain_types::TypeError),

    #[error("ledger error: {0}")]
    Ledger(#[from] logchain_ledger::LogchainError),
}

pub type SdkResult<T> = Result<T, SdkError>;
