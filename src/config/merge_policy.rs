//! Merge rules: defaults applied before any file or environment source.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("client.user_id", "")?
        .set_default("client.service_url", "http://localhost:8080")?
        .set_default("http.connect_timeout_secs", 10)?
        .set_default("http.request_timeout_secs", 120)
}
