use crate::domain::ports::{GatewayRequest, GatewayTransport};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// An in-memory transport that replays scripted responses in order.
///
/// Every request is recorded so callers can assert on what was sent.
/// Clones share the same script and request log.
#[derive(Default, Clone)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
    requests: Arc<Mutex<Vec<GatewayRequest>>>,
}

impl ScriptedTransport {
    /// Creates a new transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next response.
    pub async fn push(&self, response: Result<Value, TransportError>) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn push_json(&self, body: Value) {
        self.push(Ok(body)).await;
    }

    /// Requests sent so far, oldest first.
    pub async fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl GatewayTransport for ScriptedTransport {
    async fn send(&self, request: GatewayRequest) -> Result<Value, TransportError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response".to_string())))
    }
}
