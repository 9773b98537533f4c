//! CLI domain: parse and route only. Query behavior lives in the library modules.

mod parse;
mod route;

pub use parse::{Cli, Commands, ConfigCommands};
pub use route::{build_context, RunContext};

use crate::error::ClientError;

/// User-facing message for a failed command.
pub fn map_error(e: &ClientError) -> String {
    match e {
        ClientError::Status { status, body } if body.is_empty() => {
            format!("Service rejected the request (status {})", status)
        }
        ClientError::ConfigError(msg) => format!("{}\nSee `warden config show`.", msg),
        other => other.to_string(),
    }
}
