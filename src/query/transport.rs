//! Transport to the data service.
//!
//! The query layer only needs "send this request to that endpoint and give me the
//! decoded acknowledgement". `HttpTransport` is the JSON-over-HTTP implementation.

use super::request::{AsyncRequest, AsyncResponse};
use crate::config::HttpConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Sends access requests to the data service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit `request` to `endpoint` and decode the acknowledgement
    async fn submit(
        &self,
        endpoint: &str,
        request: &AsyncRequest,
    ) -> Result<AsyncResponse, ClientError>;
}

/// JSON over HTTP transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(
        &self,
        endpoint: &str,
        request: &AsyncRequest,
    ) -> Result<AsyncResponse, ClientError> {
        debug!(endpoint = %endpoint, "Posting data request");
        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<AsyncResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn map_http_error(error: reqwest::Error) -> ClientError {
    if let Some(status) = error.status() {
        ClientError::Status {
            status: status.as_u16(),
            body: error.to_string(),
        }
    } else if error.is_timeout() {
        ClientError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ClientError::Transport(format!("Connection error: {}", error))
    } else {
        ClientError::Transport(format!("HTTP error: {}", error))
    }
}
