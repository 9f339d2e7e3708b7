//! Typed records exchanged with the gateway.
//!
//! Field order in the `Serialize` derives is the canonical layout: the exact
//! bytes produced here are both encrypted and signed, and the gateway checks
//! the signature against the decrypted plaintext.

use super::transaction::{Amount, Challenge, InvoiceNumber, PaymentReferenceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sensitive fields of the initiate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePayload {
    pub merchant_id: String,
    pub datetime: String,
    pub order_id: InvoiceNumber,
    pub challenge: Challenge,
}

/// Sensitive fields of the complete call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePayload {
    pub merchant_id: String,
    pub order_id: InvoiceNumber,
    pub currency_code: String,
    pub amount: Amount,
    pub challenge: Challenge,
}

/// A payload that is only ever transmitted sealed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensitiveDataPayload {
    Initiate(InitiatePayload),
    Complete(CompletePayload),
}

impl From<InitiatePayload> for SensitiveDataPayload {
    fn from(payload: InitiatePayload) -> Self {
        SensitiveDataPayload::Initiate(payload)
    }
}

impl From<CompletePayload> for SensitiveDataPayload {
    fn from(payload: CompletePayload) -> Self {
        SensitiveDataPayload::Complete(payload)
    }
}

/// On-wire form of a sealed payload: base64 ciphertext plus a base64
/// signature over the plaintext.
///
/// Envelopes we produce always carry a signature; envelopes received from the
/// gateway may omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    pub sensitive_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Body of the initiate request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateRequestBody {
    pub date_time: String,
    #[serde(flatten)]
    pub envelope: EncryptedEnvelope,
}

/// Body of the complete request. The callback URL rides next to the envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequestBody {
    pub date_time: String,
    #[serde(flatten)]
    pub envelope: EncryptedEnvelope,
    #[serde(rename = "merchantCallbackURL")]
    pub merchant_callback_url: String,
    pub additional_merchant_info: Map<String, Value>,
}

/// What the gateway hands back from initiate, sealed or in the clear.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InitiateResponse {
    Sealed(EncryptedEnvelope),
    Plain(InitiateAcceptance),
}

/// The gateway's acceptance of an initiate call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateAcceptance {
    #[serde(default)]
    pub merchant_id: Option<String>,
    pub challenge: Challenge,
    pub payment_reference_id: PaymentReferenceId,
    #[serde(default)]
    pub accept_date_time: Option<String>,
}

/// Body of a complete response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "callBackUrl")]
    pub call_back_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}
