//! Config loader facade: assembles sources in precedence order.

use super::merge::merge_policy;
use super::sources::{environment, global_file};
use super::GateConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file if present, then environment.
    pub fn load() -> Result<GateConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder);
        let config: GateConfig = builder.build()?.try_deserialize()?;
        debug!("Loaded configuration from default sources");
        Ok(config)
    }

    /// Defaults, then `path` (required), then environment.
    pub fn load_from_file(path: &Path) -> Result<GateConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        let config: GateConfig = builder.build()?.try_deserialize()?;
        debug!(path = %path.display(), "Loaded configuration from file");
        Ok(config)
    }

    /// Explicit file when given, default sources otherwise.
    pub fn load_with_override(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Self::load(),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        super::paths::global_config_path()
    }
}
