//! Raw key/value media the store writes through.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use ewa_config::write_atomic;

use crate::{Result, StoreError};

const VALUE_EXTENSION: &str = "dat";

/// Durable text storage addressed by key, with a finite capacity.
///
/// Sizes are accounted as key length plus value length in bytes. A write that
/// would push the medium past its quota fails with
/// [`StoreError::QuotaExceeded`] and leaves the previous value in place.
pub trait KeyValueMedium: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
    fn used_bytes(&self) -> Result<u64>;
}

fn entry_size(key: &str, value_len: u64) -> u64 {
    key.len() as u64 + value_len
}

fn check_quota(
    quota: Option<u64>,
    key: &str,
    used: u64,
    replaced: u64,
    incoming: u64,
) -> Result<()> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let available = quota.saturating_sub(used.saturating_sub(replaced));
    if incoming > available {
        tracing::warn!(key, incoming, available, "storage quota exceeded");
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            required: incoming,
            available,
        });
    }
    Ok(())
}

/// In-process medium. Clones share the same underlying map, so a handle kept
/// by a test observes what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    quota: Option<u64>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: Option<u64>) -> Self {
        Self {
            entries: Arc::default(),
            quota,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueMedium for MemoryMedium {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        let used: u64 = entries
            .iter()
            .map(|(k, v)| entry_size(k, v.len() as u64))
            .sum();
        let replaced = entries
            .get(key)
            .map(|v| entry_size(key, v.len() as u64))
            .unwrap_or(0);
        check_quota(
            self.quota,
            key,
            used,
            replaced,
            entry_size(key, value.len() as u64),
        )?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn used_bytes(&self) -> Result<u64> {
        Ok(self
            .lock()
            .iter()
            .map(|(k, v)| entry_size(k, v.len() as u64))
            .sum())
    }
}

/// Filesystem medium: one `<key>.dat` file per key inside a directory.
/// Writes are staged to a `.tmp` sibling and renamed into place.
#[derive(Debug, Clone)]
pub struct DirectoryMedium {
    root: PathBuf,
    quota: Option<u64>,
}

impl DirectoryMedium {
    pub fn new(root: PathBuf, quota: Option<u64>) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root, quota })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn value_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueMedium for DirectoryMedium {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        let replaced = match fs::metadata(&path) {
            Ok(meta) => entry_size(key, meta.len()),
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => return Err(err.into()),
        };
        check_quota(
            self.quota,
            key,
            self.used_bytes()?,
            replaced,
            entry_size(key, value.len() as u64),
        )?;
        write_atomic(&path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn used_bytes(&self) -> Result<u64> {
        let mut total = 0;
        for key in self.keys()? {
            let meta = fs::metadata(self.value_path(&key)?)?;
            total += entry_size(&key, meta.len());
        }
        Ok(total)
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
