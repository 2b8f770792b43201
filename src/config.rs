//! Configuration System
//!
//! Layered configuration: merge-policy defaults, then the global config file,
//! then `CORTEX_GATE__*` environment variables. An explicit `--config` file
//! replaces the global file layer.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::diagnostics::DEFAULT_OLLAMA_ENDPOINT;
use crate::safety::contains_dangerous_metacharacters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod paths;
mod sources;

pub use crate::platform::detect::PlatformOverrides;
pub use facade::ConfigLoader;
pub use paths::{default_data_dir, global_config_path};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub cli: CliConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub platform: PlatformOverrides,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The external CLI the presence probe looks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

fn default_program() -> String {
    crate::command::PROGRAM.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_probe_timeout_ms() -> u64 {
    crate::probe::DEFAULT_PROBE_TIMEOUT_MS
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the sled database. Defaults to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ApiError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Location of the sled database inside the data directory.
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        Ok(self.resolve_data_dir()?.join("store"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    crate::store::journal::DEFAULT_MAX_ENTRIES
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,
}

fn default_ollama_endpoint() -> String {
    DEFAULT_OLLAMA_ENDPOINT.to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Cli(String),
    Probe(String),
    Platform(String),
    Ollama(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Cli(msg) => write!(f, "cli: {}", msg),
            ValidationError::Probe(msg) => write!(f, "probe: {}", msg),
            ValidationError::Platform(msg) => write!(f, "platform: {}", msg),
            ValidationError::Ollama(msg) => write!(f, "ollama: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl GateConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let program = self.cli.program.trim();
        if program.is_empty() {
            errors.push(ValidationError::Cli("program cannot be empty".to_string()));
        } else if contains_dangerous_metacharacters(program)
            || program.chars().any(char::is_whitespace)
            || program.contains('\'')
            || program.contains('"')
        {
            errors.push(ValidationError::Cli(format!(
                "program '{}' must be a plain executable name or path",
                program
            )));
        }

        if self.probe.timeout_ms == 0 {
            errors.push(ValidationError::Probe(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.platform.validate() {
            errors.push(ValidationError::Platform(e));
        }

        let endpoint = &self.ollama.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(ValidationError::Ollama(format!(
                "endpoint '{}' must start with http:// or https://",
                endpoint
            )));
        }

        if let Err(e) = crate::logging::validate(&self.logging) {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` folded into one error.
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
