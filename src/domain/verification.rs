use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Status code the gateway uses for a settled payment.
pub const SUCCESS_STATUS_CODE: &str = "000";
pub const SUCCESS_STATUS: &str = "Success";

/// Raw answer of the verify endpoint.
///
/// The verifier does not judge it; callers decide settlement with
/// [`VerificationResult::is_settled`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub status_code: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_payment_ref_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Every other field the gateway sent, untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VerificationResult {
    /// True only for a success code, a `Success` status and an issuer reference.
    pub fn is_settled(&self) -> bool {
        self.status_code == SUCCESS_STATUS_CODE
            && self.status == SUCCESS_STATUS
            && self
                .issuer_payment_ref_no
                .as_deref()
                .is_some_and(|r| !r.trim().is_empty())
    }
}
