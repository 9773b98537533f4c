//! Session handle: configuration plus the transport used to reach the service.

use super::transport::{HttpTransport, Transport};
use super::Query;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::ClientError;
use std::sync::Arc;

/// Path of the request-registration operation on the data service.
pub const REGISTER_REQUEST_PATH: &str = "registerDataRequest";

/// An open connection to the data service
pub struct Session {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl Session {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Validate `config` and open a session over HTTP.
    pub fn open(config: ClientConfig) -> Result<Arc<Self>, ClientError> {
        config.ensure_valid()?;
        let transport = HttpTransport::new(&config.http)?;
        Ok(Arc::new(Self::new(config, Arc::new(transport))))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Full URL requests are submitted to.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.service_url().trim_end_matches('/'),
            REGISTER_REQUEST_PATH
        )
    }

    /// Build a query for `resource_id` bound to this session.
    pub fn query(
        self: &Arc<Self>,
        resource_id: impl Into<String>,
        context: &Context,
    ) -> Result<Query, ClientError> {
        Query::new(Arc::clone(self), resource_id, context)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.config.user_id())
            .field("service_url", &self.config.service_url())
            .finish()
    }
}
