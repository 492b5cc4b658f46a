use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Duplicate subscription: {0}")]
    DuplicateSubscription(String),
}
