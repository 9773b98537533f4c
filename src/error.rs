//! Error types for the Warden client.

use thiserror::Error;

/// Context-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Argument must not be null or empty: {0}")]
    NullArgument(&'static str),

    #[error("Context value for '{key}' should be a {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors raised while building or submitting a query
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Argument must not be null or empty: {0}")]
    NullArgument(&'static str),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode service response: {0}")]
    Decode(String),

    #[error("Submission task failed: {0}")]
    TaskFailed(String),

    #[error("No async runtime available to submit the query")]
    NoRuntime,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// True for failures reported by (or on the way to) the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_)
                | ClientError::Status { .. }
                | ClientError::Decode(_)
                | ClientError::TaskFailed(_)
        )
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::ConfigError(err.to_string())
    }
}

/// Error returned by a completion handler. Isolated by the channel.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
