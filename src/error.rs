//! Error types for the cortex gate.
//!
//! `InvalidInputError` and `UnsupportedPlatformError` are user-facing and carry
//! the exact message to show. `ProbeError` never leaves the session layer: the
//! gate reads it as "CLI not confirmed".

use crate::platform::PlatformTag;
use thiserror::Error;

/// The user's request could not be turned into a safe command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InvalidInputError {
    pub reason: String,
}

impl InvalidInputError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The host platform cannot run the cortex CLI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported platform ({tag}): {reason}")]
pub struct UnsupportedPlatformError {
    pub tag: PlatformTag,
    pub reason: String,
}

/// CLI presence probe failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("CLI presence probe timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("CLI presence probe could not run: {0}")]
    Spawn(String),
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Crate-wide error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("{0}")]
    UnsupportedPlatform(#[from] UnsupportedPlatformError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    /// A submission that was not dispatched; carries the user-facing message.
    #[error("{0}")]
    NotDispatched(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
