//! Layered configuration loading.

use super::merge_policy::builder_with_defaults;
use super::sources::{environment, global_file};
use super::ClientConfig;
use config::{ConfigError, File};
use std::path::Path;

/// Loads [`ClientConfig`] from defaults, files, and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence (highest to lowest):
    /// 1. `WARDEN_*` environment variables
    /// 2. Global config file (`$XDG_CONFIG_HOME/warden/config.toml`)
    /// 3. Defaults
    pub fn load() -> Result<ClientConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration with an explicit file layered over the global one.
    ///
    /// Precedence (highest to lowest): environment, `path`, global file, defaults.
    pub fn load_from_file(path: &Path) -> Result<ClientConfig, ConfigError> {
        let builder = global_file::add_to_builder(builder_with_defaults()?)?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load from a file when given, otherwise from the default locations.
    pub fn load_optional(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
