use super::crypto::CryptoEngine;
use crate::domain::keys::{PrivateKey, PublicKey};
use crate::domain::payload::{EncryptedEnvelope, SensitiveDataPayload};
use crate::error::{PaymentError, Result};
use serde::de::DeserializeOwned;

/// Seals payloads for the gateway and opens the ones it seals for us.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeBuilder {
    engine: CryptoEngine,
}

impl EnvelopeBuilder {
    pub fn new(engine: CryptoEngine) -> Self {
        Self { engine }
    }

    /// Serializes `payload` canonically, encrypts it for `public_key` and
    /// signs the same plaintext bytes with `private_key`.
    pub fn seal(
        &self,
        payload: &SensitiveDataPayload,
        public_key: &PublicKey,
        private_key: &PrivateKey,
    ) -> Result<EncryptedEnvelope> {
        let plaintext = serde_json::to_vec(payload)
            .map_err(|e| PaymentError::EncryptionError(format!("unencodable payload: {}", e)))?;

        let sensitive_data = self.engine.encrypt(&plaintext, public_key)?;
        let signature = self.engine.sign(&plaintext, private_key)?;

        Ok(EncryptedEnvelope {
            sensitive_data,
            signature: Some(signature),
        })
    }

    /// Decrypts an envelope and, when it carries a signature and a key is
    /// given, checks that signature against the recovered plaintext.
    pub fn open_bytes(
        &self,
        envelope: &EncryptedEnvelope,
        private_key: &PrivateKey,
        signer: Option<&PublicKey>,
    ) -> Result<Vec<u8>> {
        let plaintext = self.engine.decrypt(&envelope.sensitive_data, private_key)?;

        if let (Some(signature), Some(signer)) = (envelope.signature.as_deref(), signer)
            && !self.engine.verify(&plaintext, signature, signer)
        {
            return Err(PaymentError::DecryptionError(
                "envelope signature does not match its plaintext".to_string(),
            ));
        }

        Ok(plaintext)
    }

    /// Like [`EnvelopeBuilder::open_bytes`], then parses the plaintext as JSON.
    pub fn open<T: DeserializeOwned>(
        &self,
        envelope: &EncryptedEnvelope,
        private_key: &PrivateKey,
        signer: Option<&PublicKey>,
    ) -> Result<T> {
        let plaintext = self.open_bytes(envelope, private_key, signer)?;
        serde_json::from_slice(&plaintext).map_err(|e| {
            PaymentError::DecryptionError(format!("opened payload is not the expected JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::CompletePayload;
    use crate::domain::transaction::{Challenge, InvoiceNumber};
    use crate::test_support::{gateway_keys, merchant_keys};
    use serde_json::Value;

    fn complete_payload() -> SensitiveDataPayload {
        CompletePayload {
            merchant_id: "683002007104225".to_string(),
            order_id: InvoiceNumber::new("INV12345").unwrap(),
            currency_code: "050".to_string(),
            amount: "100.00".parse().unwrap(),
            challenge: Challenge::from("f".repeat(40)),
        }
        .into()
    }

    #[test]
    fn test_sealed_payload_opens_on_the_gateway_side() {
        let builder = EnvelopeBuilder::default();
        let (gateway_private, gateway_public) = gateway_keys();
        let (merchant_private, merchant_public) = merchant_keys();
        let payload = complete_payload();

        let envelope = builder
            .seal(&payload, &gateway_public, &merchant_private)
            .unwrap();
        let plaintext = builder
            .open_bytes(&envelope, &gateway_private, Some(&merchant_public))
            .unwrap();

        assert_eq!(plaintext, serde_json::to_vec(&payload).unwrap());
    }

    #[test]
    fn test_sealing_twice_gives_distinct_envelopes_with_same_plaintext() {
        let builder = EnvelopeBuilder::default();
        let (gateway_private, gateway_public) = gateway_keys();
        let (merchant_private, merchant_public) = merchant_keys();
        let payload = complete_payload();

        let first = builder.seal(&payload, &gateway_public, &merchant_private).unwrap();
        let second = builder.seal(&payload, &gateway_public, &merchant_private).unwrap();
        assert_ne!(first.sensitive_data, second.sensitive_data);
        assert_eq!(first.signature, second.signature);

        let a: Value = builder
            .open(&first, &gateway_private, Some(&merchant_public))
            .unwrap();
        let b: Value = builder
            .open(&second, &gateway_private, Some(&merchant_public))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a["amount"], "100.00");
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let builder = EnvelopeBuilder::default();
        let (gateway_private, gateway_public) = gateway_keys();
        let (merchant_private, _) = merchant_keys();

        let mut envelope = builder
            .seal(&complete_payload(), &gateway_public, &merchant_private)
            .unwrap();
        // Signed by the wrong party
        envelope.signature = Some(
            CryptoEngine::new()
                .sign(b"something else", &gateway_private)
                .unwrap(),
        );

        let err = builder
            .open_bytes(&envelope, &gateway_private, Some(&gateway_public))
            .unwrap_err();
        assert!(matches!(err, PaymentError::DecryptionError(_)));
    }

    #[test]
    fn test_unsigned_envelope_opens_without_check() {
        let builder = EnvelopeBuilder::default();
        let (merchant_private, merchant_public) = merchant_keys();
        let (_, gateway_public) = gateway_keys();

        let envelope = EncryptedEnvelope {
            sensitive_data: CryptoEngine::new()
                .encrypt(br#"{"challenge":"abc"}"#, &merchant_public)
                .unwrap(),
            signature: None,
        };
        let opened: Value = builder
            .open(&envelope, &merchant_private, Some(&gateway_public))
            .unwrap();
        assert_eq!(opened["challenge"], "abc");
    }

    #[test]
    fn test_non_json_plaintext_is_a_decryption_error() {
        let builder = EnvelopeBuilder::default();
        let (merchant_private, merchant_public) = merchant_keys();

        let envelope = EncryptedEnvelope {
            sensitive_data: CryptoEngine::new()
                .encrypt(b"not json", &merchant_public)
                .unwrap(),
            signature: None,
        };
        let result: Result<Value> = builder.open(&envelope, &merchant_private, None);
        assert!(matches!(result, Err(PaymentError::DecryptionError(_))));
    }
}
