//! Model provider selection
//!
//! The provider interprets natural-language requests on the cortex side. The
//! gate only needs to know which one is selected and whether its credential
//! exists: Anthropic and OpenAI need an API key, Ollama runs locally and
//! needs none.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod diagnostics;

/// Setting key holding the persisted provider selection.
pub const PROVIDER_SETTING_KEY: &str = "cortex.provider";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Anthropic,
    OpenAi,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Anthropic, Provider::OpenAi, Provider::Ollama];

    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            other => Err(ApiError::ProviderError(format!(
                "Invalid provider: {}. Must be anthropic, openai, or ollama",
                other
            ))),
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
            Provider::Ollama => "Ollama",
        }
    }

    /// Secret holding this provider's API key, if it needs one.
    pub fn secret_key(self) -> Option<SecretKey> {
        match self {
            Provider::Anthropic => Some(SecretKey::Anthropic),
            Provider::OpenAi => Some(SecretKey::OpenAi),
            Provider::Ollama => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Fixed identifiers under which API keys live in the secret store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKey {
    Anthropic,
    OpenAi,
}

impl SecretKey {
    pub const ALL: [SecretKey; 2] = [SecretKey::Anthropic, SecretKey::OpenAi];

    pub fn id(self) -> &'static str {
        match self {
            SecretKey::Anthropic => "cortex.anthropic_api_key",
            SecretKey::OpenAi => "cortex.openai_api_key",
        }
    }

    /// Environment variable conventionally carrying the same key.
    pub fn env_var(self) -> &'static str {
        match self {
            SecretKey::Anthropic => "ANTHROPIC_API_KEY",
            SecretKey::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}
