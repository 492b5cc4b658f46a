//! ewa-config
//!
//! Application configuration passed explicitly into the store, repositories
//! and state container. Owns the Config data structure plus disk persistence.

pub mod atomic;
pub mod error;
pub mod manager;
pub mod model;

pub use atomic::write_atomic;
pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{default_data_dir, AccessConfig, Config, StorageConfig, StorageKeys};
