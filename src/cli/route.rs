//! CLI route: run context and dispatch to the client library.

use crate::cli::parse::{Commands, ConfigCommands};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::ClientError;
use crate::query::{Query, Session};
use serde_json::json;
use tracing::info;

/// Runtime context for CLI execution: the effective client configuration.
pub struct RunContext {
    config: ClientConfig,
}

impl RunContext {
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ClientError> {
        match command {
            Commands::Submit {
                resource,
                purpose,
                context,
                user_id,
                service_url,
                format,
            } => {
                let mut config = self.config.clone();
                if let Some(user_id) = user_id {
                    config.client.user_id = user_id.clone();
                }
                if let Some(service_url) = service_url {
                    config.client.service_url = service_url.clone();
                }
                let request_context = build_context(purpose.as_deref(), context)?;
                self.submit(config, resource, &request_context, format)
            }
            Commands::Config { command } => match command {
                ConfigCommands::Show => self.config.to_toml(),
                ConfigCommands::Validate => {
                    self.config.ensure_valid()?;
                    Ok("Configuration is valid".to_string())
                }
            },
        }
    }

    fn submit(
        &self,
        config: ClientConfig,
        resource: &str,
        context: &Context,
        format: &str,
    ) -> Result<String, ClientError> {
        let session = Session::open(config)?;
        let query = Query::new(session, resource, context)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::TaskFailed(format!("Failed to start runtime: {}", e)))?;
        let response = runtime.block_on(async { query.execute().await })?;
        info!(token = %response.token(), resource_id = %resource, "Request registered");

        match format {
            "json" => Ok(json!({
                "token": response.token(),
                "resourceId": resource,
            })
            .to_string()),
            _ => Ok(response.token().to_string()),
        }
    }
}

/// Build a request context from the purpose flag and `key=value` pairs.
pub fn build_context(purpose: Option<&str>, pairs: &[String]) -> Result<Context, ClientError> {
    let mut context = Context::new();
    for pair in pairs {
        let (key, value) = parse_context_pair(pair)?;
        context.put(key, value)?;
    }
    if let Some(purpose) = purpose {
        context.purpose(purpose);
    }
    Ok(context)
}

fn parse_context_pair(pair: &str) -> Result<(String, String), ClientError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ClientError::ConfigError(format!(
            "Invalid context entry '{}' (expected KEY=VALUE)",
            pair
        ))),
    }
}
