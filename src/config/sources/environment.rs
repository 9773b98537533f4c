//! Environment source: WARDEN_CLIENT__USER_ID, WARDEN_HTTP__REQUEST_TIMEOUT_SECS, ...

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "WARDEN";

/// Add `WARDEN_*` environment overrides; `__` separates nested keys.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    )
}
