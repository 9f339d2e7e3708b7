//! Application layer containing the gateway protocol orchestration.
//!
//! `PaymentInitiator` runs the initiate → complete state machine,
//! `PaymentVerifier` queries settlement, and `NagadClient` wires both to a
//! single immutable `MerchantConfig` and a shared transport.

pub mod client;
pub mod initiator;
pub mod verifier;

use crate::domain::config::MerchantConfig;
use crate::domain::ports::GatewayRequest;
use crate::error::TransportError;
use serde_json::Value;

pub const CLIENT_TYPE: &str = "PC_WEB";
pub const API_VERSION: &str = "v-0.2.0";

/// Adds the headers the gateway expects on every call.
pub(crate) fn with_gateway_headers(
    request: GatewayRequest,
    config: &MerchantConfig,
) -> GatewayRequest {
    request
        .with_header("Content-Type", "application/json")
        .with_header("X-KM-IP-V4", config.client_ip_address().to_string())
        .with_header("X-KM-Client-Type", CLIENT_TYPE)
        .with_header("X-KM-Api-Version", API_VERSION)
}

/// The gateway's own explanation of a rejected call, when it sent one.
pub(crate) fn gateway_message(error: &TransportError) -> Option<String> {
    let TransportError::Status { body, .. } = error else {
        return None;
    };
    let body: Value = serde_json::from_str(body).ok()?;
    ["message", "reason"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
