//! In-memory store for tests and embedding hosts.

use super::{FlagStore, SecretStore, SettingStore};
use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: RwLock<HashMap<String, String>>,
    flags: RwLock<HashMap<String, bool>>,
    settings: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.secrets.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.secrets
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.secrets.write().remove(key);
        Ok(())
    }
}

impl FlagStore for MemoryStore {
    fn get(&self, key: &str, default: bool) -> Result<bool, StorageError> {
        Ok(self.flags.read().get(key).copied().unwrap_or(default))
    }

    fn set(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.flags.write().insert(key.to_string(), value);
        Ok(())
    }
}

impl SettingStore for MemoryStore {
    fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.settings.read().get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.settings
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
