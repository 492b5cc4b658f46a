use std::collections::HashSet;
use std::path::PathBuf;

use ewa_domain::ManagerCreds;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DATA_DIR_ENV: &str = "EWA_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".ewa_core";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub access: AccessConfig,
    /// Longest base64 media payload accepted into the chat log, in characters.
    #[serde(default = "Config::default_max_media_chars")]
    pub max_media_chars: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `$EWA_CORE_HOME` or `~/.ewa_core`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            access: AccessConfig::default(),
            max_media_chars: Self::default_max_media_chars(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_max_media_chars() -> usize {
        3_000_000
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        default_data_dir()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        if self.access.liaison_passphrase.is_empty() {
            return Err(ConfigError::Invalid(
                "liaison passphrase must not be empty".into(),
            ));
        }
        if self.max_media_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_media_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Data directory used when no explicit one is configured.
pub fn default_data_dir() -> PathBuf {
    if let Some(custom) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Settings of the encrypted key/value store and its repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// When false, collections are written as plain JSON. Reads accept both.
    #[serde(default = "StorageConfig::default_encryption_enabled")]
    pub encryption_enabled: bool,
    #[serde(default = "StorageConfig::default_passphrase")]
    pub passphrase: String,
    #[serde(default = "StorageConfig::default_kdf_iterations")]
    pub kdf_iterations: u32,
    /// Capacity of the storage medium in bytes; `None` means unbounded.
    #[serde(default = "StorageConfig::default_quota_bytes")]
    pub quota_bytes: Option<u64>,
    #[serde(default)]
    pub keys: StorageKeys,
    /// Credentials reported when none have been saved yet.
    #[serde(default = "StorageConfig::default_manager_creds")]
    pub default_manager_creds: ManagerCreds,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            encryption_enabled: Self::default_encryption_enabled(),
            passphrase: Self::default_passphrase(),
            kdf_iterations: Self::default_kdf_iterations(),
            quota_bytes: Self::default_quota_bytes(),
            keys: StorageKeys::default(),
            default_manager_creds: Self::default_manager_creds(),
        }
    }
}

impl StorageConfig {
    pub fn default_encryption_enabled() -> bool {
        true
    }

    pub fn default_passphrase() -> String {
        "MDU-EWA-SECURE-KEY-INTERNAL-V1".into()
    }

    pub fn default_kdf_iterations() -> u32 {
        10_000
    }

    pub fn default_quota_bytes() -> Option<u64> {
        Some(5 * 1024 * 1024)
    }

    pub fn default_manager_creds() -> ManagerCreds {
        ManagerCreds::new("Magic$Mountain", "918144372669")
    }

    /// Plain JSON, no quota. Convenient for tests and tooling.
    pub fn plaintext() -> Self {
        Self {
            encryption_enabled: false,
            quota_bytes: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encryption_enabled && self.passphrase.is_empty() {
            return Err(ConfigError::Invalid(
                "encryption is enabled but the passphrase is empty".into(),
            ));
        }
        if self.kdf_iterations == 0 {
            return Err(ConfigError::Invalid(
                "kdf_iterations must be greater than zero".into(),
            ));
        }
        self.keys.validate()
    }
}

/// Versionless key names, one per persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub members: String,
    pub transactions: String,
    pub chat_messages: String,
    pub bot_messages: String,
    pub grievances: String,
    pub notices: String,
    pub holidays: String,
    pub meeting_link: String,
    pub manager_creds: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            members: "mdu_ewa_members".into(),
            transactions: "mdu_ewa_transactions".into(),
            chat_messages: "mdu_ewa_chat".into(),
            bot_messages: "mdu_ewa_bot_chat".into(),
            grievances: "mdu_ewa_grievances".into(),
            notices: "mdu_ewa_notices".into(),
            holidays: "mdu_ewa_holidays".into(),
            meeting_link: "mdu_ewa_meeting_link".into(),
            manager_creds: "mdu_ewa_manager_creds".into(),
        }
    }
}

impl StorageKeys {
    pub fn all(&self) -> [&str; 9] {
        [
            self.members.as_str(),
            self.transactions.as_str(),
            self.chat_messages.as_str(),
            self.bot_messages.as_str(),
            self.grievances.as_str(),
            self.notices.as_str(),
            self.holidays.as_str(),
            self.meeting_link.as_str(),
            self.manager_creds.as_str(),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for key in self.all() {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid("storage key names must not be blank".into()));
            }
            if !seen.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "storage key `{key}` is used by more than one collection"
                )));
            }
        }
        Ok(())
    }
}

/// Role-resolution settings for the login collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Shared passphrase liaison officers sign in with.
    pub liaison_passphrase: String,
    pub liaison_min_mobile_digits: usize,
    pub manager_min_password_len: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            liaison_passphrase: "$Solver".into(),
            liaison_min_mobile_digits: 10,
            manager_min_password_len: 4,
        }
    }
}
