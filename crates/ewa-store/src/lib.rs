//! ewa-store
//!
//! Encrypted key/value persistence for every entity collection.
//! A [`KeyValueMedium`] holds one text value per key; the [`EncryptedStore`]
//! seals JSON into AES-GCM envelopes on the way in and falls back to plain
//! JSON on the way out; [`Repositories`] give each collection a typed
//! get/save pair.

pub mod cipher;
pub mod error;
pub mod medium;
pub mod repository;
pub mod store;

pub use cipher::{Decrypted, EnvelopeCipher, Malformed, ENVELOPE_PREFIX};
pub use error::StoreError;
pub use medium::{DirectoryMedium, KeyValueMedium, MemoryMedium};
pub use repository::Repositories;
pub use store::EncryptedStore;

pub type Result<T> = std::result::Result<T, StoreError>;
