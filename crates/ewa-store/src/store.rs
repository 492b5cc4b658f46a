use ewa_config::StorageConfig;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    cipher::{Decrypted, EnvelopeCipher},
    medium::KeyValueMedium,
    Result,
};

/// JSON values over a [`KeyValueMedium`], sealed at rest when encryption is
/// enabled.
///
/// Reads never fail: a value that cannot be opened as an envelope is parsed as
/// plain JSON, which keeps data written before encryption was introduced
/// readable, and anything still unreadable is reported as absent.
pub struct EncryptedStore {
    medium: Box<dyn KeyValueMedium>,
    cipher: Option<EnvelopeCipher>,
    // Envelopes are always opened with the passphrase, even when new writes
    // are plain, so switching encryption off does not strand sealed values.
    reader: EnvelopeCipher,
}

impl EncryptedStore {
    pub fn new(medium: Box<dyn KeyValueMedium>, config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        let reader = EnvelopeCipher::new(config.passphrase.clone(), config.kdf_iterations);
        let cipher = config.encryption_enabled.then(|| reader.clone());
        Ok(Self {
            medium,
            cipher,
            reader,
        })
    }

    pub fn encryption_enabled(&self) -> bool {
        self.cipher.is_some()
    }

    pub fn medium(&self) -> &dyn KeyValueMedium {
        self.medium.as_ref()
    }

    /// Serializes `value` and overwrites whatever is stored under `key`.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|err| {
            tracing::error!(key, error = %err, "failed to serialize value");
            err
        })?;
        let text = match &self.cipher {
            Some(cipher) => cipher.seal(&json).map_err(|err| {
                tracing::error!(key, error = %err, "failed to seal value");
                err
            })?,
            None => json,
        };
        self.medium.write(key, &text).map_err(|err| {
            tracing::error!(key, error = %err, "failed to write value");
            err
        })?;
        tracing::debug!(key, bytes = text.len(), sealed = self.cipher.is_some(), "stored value");
        Ok(())
    }

    /// Reads the value under `key`, or `None` when absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match self.decode(&raw) {
            Some(value) => Some(value),
            None => {
                tracing::warn!(key, "stored value is neither an envelope nor JSON; treating as absent");
                None
            }
        }
    }

    /// The stored text under `key` exactly as the medium holds it.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        match self.medium.read(key) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read value; treating as absent");
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.medium.remove(key)
    }

    /// Decodes stored text: envelope first, then plain JSON.
    pub fn decode<T: DeserializeOwned>(&self, raw: &str) -> Option<T> {
        match self.reader.open(raw) {
            Decrypted::Decoded(json) => match serde_json::from_str(&json) {
                Ok(value) => return Some(value),
                Err(err) => {
                    tracing::warn!(error = %err, "decrypted value is not the expected JSON");
                }
            },
            Decrypted::Malformed(reason) => {
                tracing::debug!(%reason, "value is not an envelope; trying plain JSON");
            }
        }
        serde_json::from_str(raw).ok()
    }
}

impl std::fmt::Debug for EncryptedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedStore")
            .field("encryption_enabled", &self.encryption_enabled())
            .finish_non_exhaustive()
    }
}
