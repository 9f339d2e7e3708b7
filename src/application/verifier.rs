use super::{gateway_message, with_gateway_headers};
use crate::domain::config::MerchantConfig;
use crate::domain::payload::EncryptedEnvelope;
use crate::domain::ports::{GatewayRequest, GatewayTransportRef};
use crate::domain::transaction::PaymentReferenceId;
use crate::domain::verification::VerificationResult;
use crate::error::{PaymentError, Result};
use crate::infrastructure::envelope::EnvelopeBuilder;
use crate::interfaces::callback::CallbackRecord;
use serde_json::Value;
use std::sync::Arc;

/// Asks the gateway how a payment ended.
///
/// Surfaces the gateway's answer as-is; deciding whether it counts as settled
/// is left to [`VerificationResult::is_settled`].
pub struct PaymentVerifier {
    config: Arc<MerchantConfig>,
    transport: GatewayTransportRef,
    envelopes: EnvelopeBuilder,
}

impl PaymentVerifier {
    pub fn new(config: Arc<MerchantConfig>, transport: GatewayTransportRef) -> Self {
        Self {
            config,
            transport,
            envelopes: EnvelopeBuilder::default(),
        }
    }

    #[tracing::instrument(skip_all, fields(payment_reference_id = %payment_reference_id))]
    pub async fn verify_payment(
        &self,
        payment_reference_id: &PaymentReferenceId,
    ) -> Result<VerificationResult> {
        let config = &self.config;
        let url = config.endpoint(&config.paths().verify, &[payment_reference_id.as_str()])?;

        let response = self
            .transport
            .send(with_gateway_headers(GatewayRequest::get(url), config))
            .await
            .map_err(|e| {
                let message =
                    gateway_message(&e).unwrap_or_else(|| "verify request failed".to_string());
                tracing::warn!(error = %e, "verify request failed");
                PaymentError::verification(message, Some(e.into()))
            })?;

        let body = self.unseal(response)?;
        let result: VerificationResult = serde_json::from_value(body).map_err(|e| {
            PaymentError::verification(format!("unparseable verify response: {}", e), None)
        })?;

        tracing::debug!(
            status_code = %result.status_code,
            status = %result.status,
            "payment verified"
        );
        Ok(result)
    }

    /// Verifies the payment a gateway callback points at.
    ///
    /// Fails before any network call when the callback carries no payment
    /// reference, and rejects a verified transaction whose order id differs
    /// from the one in the callback.
    pub async fn verify_callback(&self, callback: &CallbackRecord) -> Result<VerificationResult> {
        let reference = callback
            .payment_ref_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                PaymentError::ValidationError("callback carries no payment_ref_id".to_string())
            })?;
        let result = self
            .verify_payment(&PaymentReferenceId::new(reference)?)
            .await?;

        if let (Some(expected), Some(verified)) =
            (callback.order_id.as_deref(), result.order_id.as_deref())
            && expected != verified
        {
            tracing::warn!(expected, verified, "callback order id mismatch");
            return Err(PaymentError::verification(
                format!(
                    "gateway verified order {} but the callback names order {}",
                    verified, expected
                ),
                None,
            ));
        }
        Ok(result)
    }

    /// Opens the response first when the gateway sealed it.
    ///
    /// Crypto failures propagate unchanged; a plaintext that is not JSON is a
    /// verification failure.
    fn unseal(&self, response: Value) -> Result<Value> {
        if response.get("sensitiveData").is_none() {
            return Ok(response);
        }
        let envelope: EncryptedEnvelope = serde_json::from_value(response).map_err(|e| {
            PaymentError::verification(format!("malformed sealed verify response: {}", e), None)
        })?;
        let plaintext = self.envelopes.open_bytes(
            &envelope,
            self.config.private_key(),
            Some(self.config.public_key()),
        )?;
        serde_json::from_slice(&plaintext).map_err(|e| {
            PaymentError::verification(format!("sealed verify response is not JSON: {}", e), None)
        })
    }
}
