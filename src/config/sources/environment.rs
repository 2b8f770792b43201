//! Environment source: `CORTEX_GATE__SECTION__KEY=value`.
//!
//! Double underscores separate path segments, so `CORTEX_GATE__PROBE__TIMEOUT_MS`
//! sets `probe.timeout_ms`. The single-underscore logging variables
//! (`CORTEX_GATE_LOG`, ...) are read by the logging module, not here.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "CORTEX_GATE";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
