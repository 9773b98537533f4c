//! Warden CLI Binary
//!
//! Command-line interface for submitting access requests to the data service.

use anyhow::Context as _;
use clap::Parser;
use std::process;
use tracing::{error, info};
use warden::cli::{map_error, Cli, RunContext};
use warden::config::{ClientConfig, ConfigLoader};
use warden::error::ClientError;
use warden::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();
    let loaded =
        ConfigLoader::load_optional(cli.config.as_deref()).context("loading configuration");

    // A broken config file still gets reported through the configured logger.
    let base_logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    let logging_config = build_logging_config(&cli, base_logging);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let result = loaded.and_then(|config| run(&cli, config));
    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<ClientError>() {
            Some(client_error) => eprintln!("{}", map_error(client_error)),
            None => eprintln!("{:#}", e),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli, config: ClientConfig) -> anyhow::Result<()> {
    let context = RunContext::from_config(config);
    info!("Warden CLI starting");

    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}

/// Apply CLI logging flags on top of the loaded logging configuration.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, mut config: LoggingConfig) -> LoggingConfig {
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
