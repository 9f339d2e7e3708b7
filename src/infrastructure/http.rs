use crate::domain::ports::{GatewayRequest, GatewayTransport, HttpMethod};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `GatewayTransport` backed by a `reqwest` client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    fn map_reqwest_error(url: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if e.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn send(&self, request: GatewayRequest) -> Result<Value, TransportError> {
        let url = request.url.to_string();
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, %url, "gateway request");
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_reqwest_error(&url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Self::map_reqwest_error(&url, e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| TransportError::Decode(format!("response from {} is not JSON: {}", url, e)))
    }
}
