//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key. Struct-level serde defaults cover anything
//! not listed here.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("cli.program", crate::command::PROGRAM)?
        .set_default(
            "probe.timeout_ms",
            crate::probe::DEFAULT_PROBE_TIMEOUT_MS,
        )?
        .set_default(
            "ollama.endpoint",
            crate::provider::diagnostics::DEFAULT_OLLAMA_ENDPOINT,
        )
}
