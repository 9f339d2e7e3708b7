use super::initiator::PaymentInitiator;
use super::verifier::PaymentVerifier;
use crate::domain::checkout::CheckoutOutcome;
use crate::domain::config::MerchantConfig;
use crate::domain::ports::GatewayTransportRef;
use crate::domain::transaction::{PaymentReferenceId, TransactionRequest};
use crate::domain::verification::VerificationResult;
use crate::error::Result;
use crate::infrastructure::http::HttpTransport;
use crate::interfaces::callback::CallbackRecord;
use std::sync::Arc;

/// Entry point for merchants: one configuration, one transport, both flows.
pub struct NagadClient {
    config: Arc<MerchantConfig>,
    initiator: PaymentInitiator,
    verifier: PaymentVerifier,
}

impl NagadClient {
    /// Creates a new `NagadClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated merchant configuration.
    /// * `transport` - The transport used for every gateway call.
    pub fn new(config: MerchantConfig, transport: GatewayTransportRef) -> Self {
        let config = Arc::new(config);
        Self {
            initiator: PaymentInitiator::new(Arc::clone(&config), Arc::clone(&transport)),
            verifier: PaymentVerifier::new(Arc::clone(&config), transport),
            config,
        }
    }

    /// Creates a client talking to the gateway over HTTPS.
    pub fn with_http(config: MerchantConfig) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &MerchantConfig {
        &self.config
    }

    /// Validates the request locally, then runs the checkout.
    ///
    /// An invalid amount or invoice number fails here, before any network call.
    pub async fn checkout_process(
        &self,
        amount: &str,
        invoice_number: &str,
    ) -> Result<CheckoutOutcome> {
        let request = TransactionRequest::new(amount, invoice_number)?;
        self.initiator.checkout_process(request).await
    }

    pub async fn verify_payment(&self, payment_reference_id: &str) -> Result<VerificationResult> {
        let payment_reference_id = PaymentReferenceId::new(payment_reference_id)?;
        self.verifier.verify_payment(&payment_reference_id).await
    }

    /// Verifies the payment named by a gateway callback and checks it is for the same order.
    pub async fn verify_callback(&self, callback: &CallbackRecord) -> Result<VerificationResult> {
        self.verifier.verify_callback(callback).await
    }

    pub fn initiator(&self) -> &PaymentInitiator {
        &self.initiator
    }

    pub fn verifier(&self) -> &PaymentVerifier {
        &self.verifier
    }
}
