//! CLI parse: clap types for Warden. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warden CLI - purpose-tagged access requests to a policy-governed data service
#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Submit purpose-tagged access requests to a policy-governed data service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit an access request and print the correlation token
    Submit {
        /// Resource identifier to request
        resource: String,
        /// Purpose for accessing the data
        #[arg(long)]
        purpose: Option<String>,
        /// Extra context entries as key=value (repeatable)
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
        /// Override the configured user id
        #[arg(long)]
        user_id: Option<String>,
        /// Override the configured service URL
        #[arg(long)]
        service_url: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the effective configuration
    Validate,
}
