//! Configuration System
//!
//! Client configuration: who the caller is, where the data service lives, and how
//! the HTTP transport and logging behave. Loaded hierarchically from defaults, the
//! user-level config file, an explicit file, and `WARDEN_*` environment variables.

use crate::error::ClientError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod loader;
mod merge_policy;
mod sources;

pub use loader::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Caller identity and service location
    #[serde(default)]
    pub client: ServiceConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Caller identity and the data service endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// User identifier sent with every request
    #[serde(default)]
    pub user_id: String,

    /// Base URL of the data service
    #[serde(default = "default_service_url")]
    pub service_url: String,
}

fn default_service_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            service_url: default_service_url(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Client(String),
    Http(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Client(msg) => write!(f, "Client: {}", msg),
            ValidationError::Http(msg) => write!(f, "HTTP: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("user_id cannot be empty".to_string());
        }
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://"))
        {
            return Err(format!(
                "service_url must start with http:// or https://, got '{}'",
                self.service_url
            ));
        }
        Ok(())
    }
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl ClientConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.client.validate() {
            errors.push(ValidationError::Client(e));
        }
        if let Err(e) = self.http.validate() {
            errors.push(ValidationError::Http(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into a single error.
    pub fn ensure_valid(&self) -> Result<(), ClientError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ClientError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self)
            .map_err(|e| ClientError::ConfigError(format!("Failed to render config: {}", e)))
    }

    pub fn user_id(&self) -> &str {
        &self.client.user_id
    }

    pub fn service_url(&self) -> &str {
        &self.client.service_url
    }
}
