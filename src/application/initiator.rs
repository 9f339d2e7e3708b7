use super::{gateway_message, with_gateway_headers};
use crate::domain::checkout::{CheckoutOutcome, CheckoutSession, CheckoutState};
use crate::domain::config::MerchantConfig;
use crate::domain::payload::{
    CompletePayload, CompleteRequestBody, CompleteResponse, InitiateAcceptance, InitiatePayload,
    InitiateRequestBody, InitiateResponse, SensitiveDataPayload,
};
use crate::domain::ports::{GatewayRequest, GatewayTransportRef};
use crate::domain::transaction::{CURRENCY_CODE, Challenge, TransactionRequest, gateway_timestamp};
use crate::domain::verification::SUCCESS_STATUS;
use crate::error::{PaymentError, Result};
use crate::infrastructure::envelope::EnvelopeBuilder;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Drives one checkout through initiate and complete.
///
/// Holds no per-transaction state between calls: every `checkout_process`
/// runs its own [`CheckoutSession`], so concurrent checkouts only need
/// distinct invoice numbers.
pub struct PaymentInitiator {
    config: Arc<MerchantConfig>,
    transport: GatewayTransportRef,
    envelopes: EnvelopeBuilder,
}

impl PaymentInitiator {
    pub fn new(config: Arc<MerchantConfig>, transport: GatewayTransportRef) -> Self {
        Self {
            config,
            transport,
            envelopes: EnvelopeBuilder::default(),
        }
    }

    /// Runs initiate then complete and returns the URL the customer must be sent to.
    ///
    /// The complete call is never issued when initiate fails. Nothing is retried.
    #[tracing::instrument(
        name = "checkout_process",
        skip_all,
        fields(invoice = %request.invoice_number)
    )]
    pub async fn checkout_process(&self, request: TransactionRequest) -> Result<CheckoutOutcome> {
        let mut session = CheckoutSession::new();
        match self.drive(&mut session, &request).await {
            Ok(outcome) => {
                tracing::info!(
                    payment_reference_id = %outcome.payment_reference_id,
                    "checkout redirected"
                );
                Ok(outcome)
            }
            Err(e) => {
                let state = session.state();
                session.fail();
                tracing::warn!(%state, kind = e.kind(), error = %e, "checkout failed");
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        session: &mut CheckoutSession,
        request: &TransactionRequest,
    ) -> Result<CheckoutOutcome> {
        let response = self.initiate(request).await?;
        session.advance(CheckoutState::Initiated)?;

        let acceptance = self.accept(response)?;
        session.advance(CheckoutState::Challenged)?;
        tracing::debug!(
            payment_reference_id = %acceptance.payment_reference_id,
            "initiate accepted"
        );

        let completed = self.complete(request, &acceptance).await?;
        session.advance(CheckoutState::Completed)?;

        let outcome = redirect(completed, acceptance)?;
        session.advance(CheckoutState::Redirected)?;
        Ok(outcome)
    }

    async fn initiate(&self, request: &TransactionRequest) -> Result<InitiateResponse> {
        let config = &self.config;
        let datetime = gateway_timestamp();
        let payload = SensitiveDataPayload::from(InitiatePayload {
            merchant_id: config.merchant_id().to_string(),
            datetime: datetime.clone(),
            order_id: request.invoice_number.clone(),
            challenge: Challenge::generate(),
        });
        let envelope = self
            .envelopes
            .seal(&payload, config.public_key(), config.private_key())?;

        let url = config.endpoint(
            &config.paths().initiate,
            &[config.merchant_id(), request.invoice_number.as_str()],
        )?;
        let body = serde_json::to_value(InitiateRequestBody {
            date_time: datetime,
            envelope,
        })
        .map_err(|e| PaymentError::initiation(format!("unencodable request body: {}", e), None))?;

        let response = self
            .transport
            .send(with_gateway_headers(GatewayRequest::post(url, body), config))
            .await
            .map_err(|e| {
                let message = gateway_message(&e)
                    .unwrap_or_else(|| "initiate request failed".to_string());
                PaymentError::initiation(message, Some(e.into()))
            })?;

        serde_json::from_value(response).map_err(|e| {
            PaymentError::initiation(format!("unrecognized initiate response: {}", e), None)
        })
    }

    /// Extracts the challenge and payment reference from the initiate response.
    fn accept(&self, response: InitiateResponse) -> Result<InitiateAcceptance> {
        let acceptance = match response {
            InitiateResponse::Plain(acceptance) => acceptance,
            InitiateResponse::Sealed(envelope) => {
                let plaintext = self.envelopes.open_bytes(
                    &envelope,
                    self.config.private_key(),
                    Some(self.config.public_key()),
                )?;
                let value: Value = serde_json::from_slice(&plaintext).map_err(|_| {
                    PaymentError::CheckProcessError(
                        "opened initiate payload is not JSON".to_string(),
                    )
                })?;
                serde_json::from_value(value).map_err(|e| {
                    PaymentError::initiation(format!("incomplete initiate acceptance: {}", e), None)
                })?
            }
        };

        if acceptance.challenge.as_str().is_empty()
            || acceptance.payment_reference_id.as_str().trim().is_empty()
        {
            return Err(PaymentError::initiation(
                "gateway returned an empty challenge or payment reference",
                None,
            ));
        }
        if let Some(merchant_id) = &acceptance.merchant_id
            && merchant_id != self.config.merchant_id()
        {
            return Err(PaymentError::initiation(
                format!("acceptance is addressed to merchant {}", merchant_id),
                None,
            ));
        }

        Ok(acceptance)
    }

    async fn complete(
        &self,
        request: &TransactionRequest,
        acceptance: &InitiateAcceptance,
    ) -> Result<CompleteResponse> {
        let config = &self.config;
        let payload = SensitiveDataPayload::from(CompletePayload {
            merchant_id: config.merchant_id().to_string(),
            order_id: request.invoice_number.clone(),
            currency_code: CURRENCY_CODE.to_string(),
            amount: request.amount,
            challenge: acceptance.challenge.clone(),
        });
        let envelope = self
            .envelopes
            .seal(&payload, config.public_key(), config.private_key())?;

        let url = config.endpoint(
            &config.paths().complete,
            &[acceptance.payment_reference_id.as_str()],
        )?;
        let body = serde_json::to_value(CompleteRequestBody {
            date_time: gateway_timestamp(),
            envelope,
            merchant_callback_url: config.callback_url().to_string(),
            additional_merchant_info: Map::new(),
        })
        .map_err(|e| PaymentError::complete(format!("unencodable request body: {}", e), None))?;

        let response = self
            .transport
            .send(with_gateway_headers(GatewayRequest::post(url, body), config))
            .await
            .map_err(|e| {
                let message = gateway_message(&e)
                    .unwrap_or_else(|| "complete request failed".to_string());
                PaymentError::complete(message, Some(e.into()))
            })?;

        serde_json::from_value(response).map_err(|e| {
            PaymentError::complete(format!("unrecognized complete response: {}", e), None)
        })
    }
}

fn redirect(
    completed: CompleteResponse,
    acceptance: InitiateAcceptance,
) -> Result<CheckoutOutcome> {
    let status = completed.status.unwrap_or_default();
    let call_back_url = completed.call_back_url.filter(|u| !u.trim().is_empty());

    match call_back_url {
        Some(call_back_url) if status == SUCCESS_STATUS => Ok(CheckoutOutcome {
            call_back_url,
            status,
            payment_reference_id: acceptance.payment_reference_id,
        }),
        _ => {
            let detail = completed
                .message
                .or(completed.reason)
                .unwrap_or_else(|| "no callback URL returned".to_string());
            Err(PaymentError::complete(
                format!("gateway answered '{}': {}", status, detail),
                None,
            ))
        }
    }
}
