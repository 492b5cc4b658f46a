use ewa_config::{StorageConfig, StorageKeys};
use ewa_domain::{
    BotMessage, ChatMessage, Grievance, Holiday, ManagerCreds, Member, Notice, Transaction,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{medium::KeyValueMedium, store::EncryptedStore, Result};

/// Leading characters of any base64 text that opens with `Salted__`.
const SEALED_HINT: &str = "U2F";

/// Typed get/save pairs, one per persisted collection.
///
/// Getters never fail; an absent or unreadable collection is empty. Savers
/// replace the whole collection under its key.
#[derive(Debug)]
pub struct Repositories {
    store: EncryptedStore,
    keys: StorageKeys,
    default_creds: ManagerCreds,
}

impl Repositories {
    pub fn new(medium: Box<dyn KeyValueMedium>, config: &StorageConfig) -> Result<Self> {
        Ok(Self {
            store: EncryptedStore::new(medium, config)?,
            keys: config.keys.clone(),
            default_creds: config.default_manager_creds.clone(),
        })
    }

    pub fn store(&self) -> &EncryptedStore {
        &self.store
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    fn list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.store.get(key).unwrap_or_default()
    }

    fn save_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.store.put(key, items)
    }

    pub fn get_members(&self) -> Vec<Member> {
        self.list(&self.keys.members)
    }

    pub fn save_members(&self, members: &[Member]) -> Result<()> {
        self.save_list(&self.keys.members, members)
    }

    pub fn get_transactions(&self) -> Vec<Transaction> {
        self.list(&self.keys.transactions)
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.save_list(&self.keys.transactions, transactions)
    }

    pub fn get_chat_messages(&self) -> Vec<ChatMessage> {
        self.list(&self.keys.chat_messages)
    }

    pub fn save_chat_messages(&self, messages: &[ChatMessage]) -> Result<()> {
        self.save_list(&self.keys.chat_messages, messages)
    }

    pub fn get_bot_messages(&self) -> Vec<BotMessage> {
        self.list(&self.keys.bot_messages)
    }

    pub fn save_bot_messages(&self, messages: &[BotMessage]) -> Result<()> {
        self.save_list(&self.keys.bot_messages, messages)
    }

    pub fn get_grievances(&self) -> Vec<Grievance> {
        self.list(&self.keys.grievances)
    }

    pub fn save_grievances(&self, grievances: &[Grievance]) -> Result<()> {
        self.save_list(&self.keys.grievances, grievances)
    }

    pub fn get_notices(&self) -> Vec<Notice> {
        self.list(&self.keys.notices)
    }

    pub fn save_notices(&self, notices: &[Notice]) -> Result<()> {
        self.save_list(&self.keys.notices, notices)
    }

    pub fn get_holidays(&self) -> Vec<Holiday> {
        self.list(&self.keys.holidays)
    }

    pub fn save_holidays(&self, holidays: &[Holiday]) -> Result<()> {
        self.save_list(&self.keys.holidays, holidays)
    }

    /// The meeting link, or an empty string when none is stored.
    ///
    /// Older data kept the link as a bare string. Anything that looks like
    /// neither JSON nor an envelope is returned as-is.
    pub fn get_meeting_link(&self) -> String {
        let key = &self.keys.meeting_link;
        let Some(raw) = self.store.get_raw(key) else {
            return String::new();
        };
        if is_legacy_plain(&raw) {
            tracing::debug!(key = key.as_str(), "meeting link stored as a bare string");
            return raw;
        }
        self.store.decode(&raw).unwrap_or_default()
    }

    pub fn save_meeting_link(&self, link: &str) -> Result<()> {
        self.store.put(&self.keys.meeting_link, link)
    }

    /// Stored manager credentials, or the configured default pair.
    pub fn get_manager_creds(&self) -> ManagerCreds {
        self.store
            .get(&self.keys.manager_creds)
            .unwrap_or_else(|| self.default_creds.clone())
    }

    pub fn save_manager_creds(&self, creds: &ManagerCreds) -> Result<()> {
        self.store.put(&self.keys.manager_creds, creds)
    }
}

fn is_legacy_plain(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    !(trimmed.starts_with('{') || trimmed.starts_with('"') || trimmed.starts_with(SEALED_HINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_detection() {
        assert!(is_legacy_plain("https://meet.example.org/ewa"));
        assert!(!is_legacy_plain("\"https://meet.example.org/ewa\""));
        assert!(!is_legacy_plain("{\"url\":1}"));
        assert!(!is_legacy_plain("U2FsdGVkX1abc"));
        assert!(!is_legacy_plain("U2Fz"));
        assert!(crate::ENVELOPE_PREFIX.starts_with(SEALED_HINT));
    }
}
