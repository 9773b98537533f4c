//! Event schema for completion notifications.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// The resource stream for `token` is exhausted. Carries no resource payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CompletionEventRepr")]
pub struct CompletionEvent {
    token: String,
}

#[derive(Deserialize)]
struct CompletionEventRepr {
    token: String,
}

impl TryFrom<CompletionEventRepr> for CompletionEvent {
    type Error = ClientError;

    fn try_from(repr: CompletionEventRepr) -> Result<Self, Self::Error> {
        CompletionEvent::new(repr.token)
    }
}

impl CompletionEvent {
    pub fn new(token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ClientError::NullArgument("token"));
        }
        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
