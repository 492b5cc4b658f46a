use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Storage quota exceeded: writing `{key}` needs {required} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        required: u64,
        available: u64,
    },
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ewa_config::ConfigError),
}
