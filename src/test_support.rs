//! Shared fixtures for unit tests. RSA key generation is slow, so each key
//! pair is generated once per test binary.

use crate::domain::config::MerchantConfigBuilder;
use crate::domain::keys::{PrivateKey, PublicKey};
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use std::sync::OnceLock;

const TEST_KEY_BITS: usize = 1024;

fn generate() -> PrivateKey {
    RsaPrivateKey::new(&mut rand::thread_rng(), TEST_KEY_BITS)
        .expect("failed to generate test key")
        .into()
}

/// The gateway's key pair: its public half goes into the merchant config.
pub fn gateway_keys() -> (PrivateKey, PublicKey) {
    static KEY: OnceLock<PrivateKey> = OnceLock::new();
    let private = KEY.get_or_init(generate).clone();
    let public = private.public_key();
    (private, public)
}

/// The merchant's key pair: its private half goes into the merchant config.
pub fn merchant_keys() -> (PrivateKey, PublicKey) {
    static KEY: OnceLock<PrivateKey> = OnceLock::new();
    let private = KEY.get_or_init(generate).clone();
    let public = private.public_key();
    (private, public)
}

pub fn config_builder(base_url: &str) -> MerchantConfigBuilder {
    let (_, gateway_public) = gateway_keys();
    let (merchant_private, _) = merchant_keys();

    MerchantConfigBuilder::default()
        .merchant_id("683002007104225")
        .base_url(base_url)
        .callback_url("https://shop.example.com/callback")
        .public_key(
            gateway_public
                .inner()
                .to_public_key_pem(LineEnding::LF)
                .expect("encode public key"),
        )
        .private_key(
            merchant_private
                .inner()
                .to_pkcs8_pem(LineEnding::LF)
                .expect("encode private key")
                .as_str(),
        )
        .client_ip_address("10.0.0.7")
}
