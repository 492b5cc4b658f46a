//! Passphrase-based AES-256-GCM envelopes.
//!
//! Envelope layout, base64 encoded as a whole:
//!
//! ```text
//! "Salted__" | salt (8) | nonce (12) | ciphertext | tag (16)
//! ```
//!
//! The key is PBKDF2-HMAC-SHA256 over the passphrase and the per-envelope
//! salt. Because of the fixed header every envelope's text starts with
//! [`ENVELOPE_PREFIX`], which lets readers tell envelopes from plain values.

use std::fmt;

use aes_gcm::aead::{rand_core::RngCore, Aead, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::{Result, StoreError};

/// Text every envelope begins with (base64 of the `Salted__` header).
pub const ENVELOPE_PREFIX: &str = "U2FsdGVkX1";

const HEADER: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Outcome of opening an envelope. Failure is a value, not an error: callers
/// pick their fallback by matching on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decrypted {
    Decoded(String),
    Malformed(Malformed),
}

/// Why a text could not be opened as an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    NotBase64,
    MissingHeader,
    Truncated,
    /// Wrong passphrase or tampered ciphertext.
    Authentication,
    NotUtf8,
    /// Decryption produced no text.
    Empty,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Malformed::NotBase64 => "not base64",
            Malformed::MissingHeader => "missing envelope header",
            Malformed::Truncated => "truncated envelope",
            Malformed::Authentication => "authentication failed",
            Malformed::NotUtf8 => "plaintext is not UTF-8",
            Malformed::Empty => "empty plaintext",
        };
        f.write_str(label)
    }
}

#[derive(Clone)]
pub struct EnvelopeCipher {
    passphrase: String,
    iterations: u32,
}

impl fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeCipher")
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

impl EnvelopeCipher {
    pub fn new(passphrase: impl Into<String>, iterations: u32) -> Self {
        Self {
            passphrase: passphrase.into(),
            iterations: iterations.max(1),
        }
    }

    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut iv);

        let key = self.derive_key(&salt);
        let cipher = Aes256Gcm::new_from_slice(key.as_slice())
            .map_err(|err| StoreError::Encryption(err.to_string()))?;
        let encrypted = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|err| StoreError::Encryption(err.to_string()))?;

        let mut envelope =
            Vec::with_capacity(HEADER.len() + SALT_LEN + NONCE_LEN + encrypted.len());
        envelope.extend_from_slice(HEADER);
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&encrypted);
        Ok(B64.encode(envelope))
    }

    pub fn open(&self, envelope: &str) -> Decrypted {
        let bytes = match B64.decode(envelope.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return Decrypted::Malformed(Malformed::NotBase64),
        };
        let Some(rest) = bytes.strip_prefix(HEADER.as_slice()) else {
            return Decrypted::Malformed(Malformed::MissingHeader);
        };
        if rest.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Decrypted::Malformed(Malformed::Truncated);
        }
        let (salt, rest) = rest.split_at(SALT_LEN);
        let (iv, sealed) = rest.split_at(NONCE_LEN);

        let key = self.derive_key(salt);
        let cipher = match Aes256Gcm::new_from_slice(key.as_slice()) {
            Ok(cipher) => cipher,
            Err(_) => return Decrypted::Malformed(Malformed::Authentication),
        };
        let decrypted = match cipher.decrypt(Nonce::from_slice(iv), sealed) {
            Ok(value) => value,
            Err(_) => return Decrypted::Malformed(Malformed::Authentication),
        };
        match String::from_utf8(decrypted) {
            Ok(text) if text.is_empty() => Decrypted::Malformed(Malformed::Empty),
            Ok(text) => Decrypted::Decoded(text),
            Err(_) => Decrypted::Malformed(Malformed::NotUtf8),
        }
    }

    fn derive_key(&self, salt: &[u8]) -> [u8; 32] {
        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(self.passphrase.as_bytes(), salt, self.iterations, &mut key);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> EnvelopeCipher {
        EnvelopeCipher::new("test-passphrase", 16)
    }

    #[test]
    fn seal_then_open() {
        let sealed = cipher().seal(r#"{"a":1}"#).unwrap();
        assert!(sealed.starts_with(ENVELOPE_PREFIX));
        assert_eq!(cipher().open(&sealed), Decrypted::Decoded(r#"{"a":1}"#.into()));
    }

    #[test]
    fn every_seal_uses_fresh_salt_and_nonce() {
        let first = cipher().seal("same").unwrap();
        let second = cipher().seal("same").unwrap();
        assert_ne!(first, second);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn wrong_passphrase_fails_authentication() {
        let sealed = cipher().seal("secret").unwrap();
        let other = EnvelopeCipher::new("other", 16);
        assert_eq!(other.open(&sealed), Decrypted::Malformed(Malformed::Authentication));
    }

    #[test]
    fn classifies_non_envelopes() {
        let cipher = cipher();
        assert_eq!(cipher.open("[1,2,3]"), Decrypted::Malformed(Malformed::NotBase64));
        assert_eq!(
            cipher.open(&B64.encode(b"plain bytes here")),
            Decrypted::Malformed(Malformed::MissingHeader)
        );
        assert_eq!(
            cipher.open(&B64.encode(b"Salted__short")),
            Decrypted::Malformed(Malformed::Truncated)
        );
    }

    #[test]
    fn empty_plaintext_is_reported_as_empty() {
        let sealed = cipher().seal("").unwrap();
        assert_eq!(cipher().open(&sealed), Decrypted::Malformed(Malformed::Empty));
    }
}
