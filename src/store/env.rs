//! Environment-variable overlay for API keys.
//!
//! `ANTHROPIC_API_KEY` / `OPENAI_API_KEY` win over the inner store on read.
//! Writes and deletes go to the inner store only.

use super::SecretStore;
use crate::error::StorageError;
use crate::provider::SecretKey;
use std::sync::Arc;

pub struct EnvSecretStore {
    inner: Arc<dyn SecretStore>,
    lookup: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl EnvSecretStore {
    pub fn new(inner: Arc<dyn SecretStore>) -> Self {
        Self::with_lookup(inner, |name| std::env::var(name).ok())
    }

    pub fn with_lookup<F>(inner: Arc<dyn SecretStore>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            inner,
            lookup: Box::new(lookup),
        }
    }

    /// Whether the environment (not the inner store) supplies `key`.
    pub fn from_environment(&self, key: &str) -> bool {
        self.env_value(key).is_some()
    }

    fn env_value(&self, key: &str) -> Option<String> {
        let secret = SecretKey::from_id(key)?;
        (self.lookup)(secret.env_var()).filter(|v| !v.trim().is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(value) = self.env_value(key) {
            return Ok(Some(value));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key)
    }
}
