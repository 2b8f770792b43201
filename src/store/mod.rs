//! Collaborator stores
//!
//! The gate reads three kinds of durable state, each behind its own narrow
//! trait so hosts can plug in whatever they already have (an OS keychain for
//! secrets, an editor's global state for flags):
//!
//! - [`SecretStore`]: API keys
//! - [`FlagStore`]: onboarding booleans
//! - [`SettingStore`]: the provider selection
//!
//! [`MemoryStore`] and [`SledStore`] implement all three.

pub mod env;
pub mod journal;
pub mod memory;
pub mod persistence;

pub use env::EnvSecretStore;
pub use journal::{Journal, JournalEntry};
pub use memory::MemoryStore;
pub use persistence::SledStore;

use crate::error::StorageError;

/// Secret storage keyed by fixed identifiers (see [`crate::provider::SecretKey`]).
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Durable boolean flags.
pub trait FlagStore: Send + Sync {
    fn get(&self, key: &str, default: bool) -> Result<bool, StorageError>;
    fn set(&self, key: &str, value: bool) -> Result<(), StorageError>;
}

/// Durable string settings.
pub trait SettingStore: Send + Sync {
    fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_setting(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Onboarding flags and their fixed identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    CliConfirmed,
    InstallPromptShown,
    SetupComplete,
}

impl Flag {
    pub fn id(self) -> &'static str {
        match self {
            Flag::CliConfirmed => "cortex.cli_confirmed",
            Flag::InstallPromptShown => "cortex.install_prompt_shown",
            Flag::SetupComplete => "cortex.setup_complete",
        }
    }
}
