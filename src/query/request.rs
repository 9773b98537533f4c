//! Request and response shapes exchanged with the data service.

use crate::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request registering a data access request with the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncRequest {
    pub user_id: String,
    pub resource_id: String,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl AsyncRequest {
    pub fn new(
        user_id: impl Into<String>,
        resource_id: impl Into<String>,
        context: &Context,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            resource_id: resource_id.into(),
            context: flatten_context(context),
        }
    }
}

/// Service acknowledgement carrying the correlation token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncResponse {
    pub token: String,
}

/// Flatten context values to strings: JSON strings verbatim, anything else as compact JSON.
pub fn flatten_context(context: &Context) -> BTreeMap<String, String> {
    context
        .contents()
        .iter()
        .map(|(key, value)| {
            let flat = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), flat)
        })
        .collect()
}

/// Payloads that travel with an explicit `class` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum TypedPayload {
    Context(Context),
}
