use ewa_config::ConfigError;
use ewa_ledger::LedgerError;
use ewa_store::StoreError;
use thiserror::Error;

use crate::access::AccessError;

/// Failures surfaced by the application state container.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Access denied: {0}")]
    Access(#[from] AccessError),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Media payload of {size} characters exceeds the limit of {limit}")]
    PayloadTooLarge { size: usize, limit: usize },
}

impl AppError {
    /// True when the in-memory state already holds the change but it could
    /// not be written through.
    pub fn is_unpersisted(&self) -> bool {
        matches!(self, AppError::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
