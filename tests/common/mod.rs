#![allow(dead_code)]

use nagadpay::domain::config::MerchantConfigBuilder;
use nagadpay::domain::keys::{PrivateKey, PublicKey};
use nagadpay::infrastructure::crypto::CryptoEngine;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use serde_json::{Value, json};
use std::sync::OnceLock;

pub const MERCHANT_ID: &str = "683002007104225";
pub const CALLBACK_URL: &str = "https://shop.example.com/callback";
pub const CLIENT_IP: &str = "10.0.0.7";

// Key generation dominates test time, so keep keys small and generate once.
fn generate() -> RsaPrivateKey {
    RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap()
}

fn gateway_rsa() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(generate)
}

fn merchant_rsa() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(generate)
}

pub fn gateway_public_pem() -> String {
    gateway_rsa()
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .unwrap()
}

pub fn merchant_private_pem() -> String {
    merchant_rsa()
        .to_pkcs8_pem(LineEnding::LF)
        .unwrap()
        .as_str()
        .to_string()
}

pub fn gateway_private() -> PrivateKey {
    PrivateKey::from(gateway_rsa().clone())
}

pub fn merchant_public() -> PublicKey {
    PublicKey::from(merchant_rsa().to_public_key())
}

pub fn config_builder(base_url: &str) -> MerchantConfigBuilder {
    MerchantConfigBuilder::default()
        .merchant_id(MERCHANT_ID)
        .base_url(base_url)
        .callback_url(CALLBACK_URL)
        .public_key(gateway_public_pem())
        .private_key(merchant_private_pem())
        .client_ip_address(CLIENT_IP)
}

/// Seals `body` for the merchant and signs it with the gateway key.
pub fn sealed_by_gateway(body: &Value) -> Value {
    let engine = CryptoEngine::new();
    let plaintext = serde_json::to_vec(body).unwrap();
    json!({
        "sensitiveData": engine.encrypt(&plaintext, &merchant_public()).unwrap(),
        "signature": engine.sign(&plaintext, &gateway_private()).unwrap(),
    })
}

/// Opens a payload the merchant sealed for the gateway.
pub fn opened_by_gateway(body: &Value) -> Value {
    let plaintext = CryptoEngine::new()
        .decrypt(body["sensitiveData"].as_str().unwrap(), &gateway_private())
        .unwrap();
    serde_json::from_slice(&plaintext).unwrap()
}

pub fn initiate_acceptance(reference: &str) -> Value {
    sealed_by_gateway(&json!({
        "merchantId": MERCHANT_ID,
        "challenge": "gatewaychallenge0123456789",
        "paymentReferenceId": reference,
        "acceptDateTime": "20240201021510"
    }))
}
