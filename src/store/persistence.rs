//! Sled-backed store
//!
//! Flags, settings, and secrets live in separate trees of one sled database.
//! Values are JSON encoded. The secrets tree is plaintext on disk; hosts with
//! an OS keychain should supply their own [`SecretStore`] instead.

use super::{FlagStore, SecretStore, SettingStore};
use crate::error::StorageError;
use sled::{Db, Tree};
use std::path::Path;

const TREE_FLAGS: &str = "flags";
const TREE_SETTINGS: &str = "settings";
const TREE_SECRETS: &str = "secrets";

#[derive(Clone)]
pub struct SledStore {
    db: Db,
    flags: Tree,
    settings: Tree,
    secrets: Tree,
}

impl SledStore {
    /// Open (or create) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| {
            StorageError::Backend(format!("Failed to open sled database: {}", e))
        })?;
        Self::from_db(db)
    }

    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        let flags = db.open_tree(TREE_FLAGS)?;
        let settings = db.open_tree(TREE_SETTINGS)?;
        let secrets = db.open_tree(TREE_SECRETS)?;
        Ok(Self {
            db,
            flags,
            settings,
            secrets,
        })
    }

    /// Underlying database, shared with the journal.
    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

fn get_string(tree: &Tree, key: &str) -> Result<Option<String>, StorageError> {
    let Some(raw) = tree.get(key.as_bytes())? else {
        return Ok(None);
    };
    let value: String = serde_json::from_slice(&raw)
        .map_err(|e| StorageError::Corrupt(format!("{}: {}", key, e)))?;
    Ok(Some(value))
}

fn put_json<T: serde::Serialize>(tree: &Tree, key: &str, value: &T) -> Result<(), StorageError> {
    let encoded = serde_json::to_vec(value)
        .map_err(|e| StorageError::Corrupt(format!("{}: {}", key, e)))?;
    tree.insert(key.as_bytes(), encoded)?;
    tree.flush()?;
    Ok(())
}

impl SecretStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        get_string(&self.secrets, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        put_json(&self.secrets, key, &value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.secrets.remove(key.as_bytes())?;
        self.secrets.flush()?;
        Ok(())
    }
}

impl FlagStore for SledStore {
    fn get(&self, key: &str, default: bool) -> Result<bool, StorageError> {
        let Some(raw) = self.flags.get(key.as_bytes())? else {
            return Ok(default);
        };
        serde_json::from_slice(&raw).map_err(|e| StorageError::Corrupt(format!("{}: {}", key, e)))
    }

    fn set(&self, key: &str, value: bool) -> Result<(), StorageError> {
        put_json(&self.flags, key, &value)
    }
}

impl SettingStore for SledStore {
    fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        get_string(&self.settings, key)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        put_json(&self.settings, key, &value)
    }
}
