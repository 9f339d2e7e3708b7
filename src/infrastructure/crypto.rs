//! RSA primitives used to seal and verify gateway payloads.
//!
//! Encryption is RSA PKCS#1 v1.5. Plaintext longer than one block
//! (`key_size - 11` bytes) is split into blocks encrypted independently and
//! concatenated. Signatures are SHA-256 digests signed with RSA PKCS#1 v1.5.
//! Every binary output is standard base64.

use crate::domain::keys::{PrivateKey, PublicKey};
use crate::error::{PaymentError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign};
use sha2::{Digest, Sha256};

/// Bytes of PKCS#1 v1.5 padding overhead per encrypted block.
const PKCS1_PADDING_OVERHEAD: usize = 11;

/// Stateless RSA engine; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoEngine;

impl CryptoEngine {
    pub fn new() -> Self {
        Self
    }

    /// Encrypts `plaintext` with `public_key`, chunking as needed.
    pub fn encrypt(&self, plaintext: &[u8], public_key: &PublicKey) -> Result<String> {
        let block = public_key
            .size()
            .checked_sub(PKCS1_PADDING_OVERHEAD)
            .filter(|b| *b > 0)
            .ok_or_else(|| {
                PaymentError::EncryptionError("public key is too small to encrypt".to_string())
            })?;

        let mut rng = rand::thread_rng();
        let mut ciphertext = Vec::with_capacity(plaintext.len().div_ceil(block) * public_key.size());
        // An empty plaintext still produces one block.
        let chunks: Vec<&[u8]> = if plaintext.is_empty() {
            vec![plaintext]
        } else {
            plaintext.chunks(block).collect()
        };
        for chunk in chunks {
            let encrypted = public_key
                .inner()
                .encrypt(&mut rng, Pkcs1v15Encrypt, chunk)
                .map_err(|e| PaymentError::EncryptionError(e.to_string()))?;
            ciphertext.extend_from_slice(&encrypted);
        }

        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypts base64 `ciphertext` produced by [`CryptoEngine::encrypt`].
    pub fn decrypt(&self, ciphertext: &str, private_key: &PrivateKey) -> Result<Vec<u8>> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| PaymentError::DecryptionError(format!("ciphertext is not base64: {}", e)))?;

        let block = private_key.size();
        if raw.is_empty() || raw.len() % block != 0 {
            return Err(PaymentError::DecryptionError(format!(
                "ciphertext length {} is not a multiple of the {}-byte key size",
                raw.len(),
                block
            )));
        }

        let mut plaintext = Vec::with_capacity(raw.len());
        for chunk in raw.chunks(block) {
            let decrypted = private_key
                .inner()
                .decrypt(Pkcs1v15Encrypt, chunk)
                .map_err(|_| {
                    PaymentError::DecryptionError(
                        "ciphertext does not decrypt with the private key".to_string(),
                    )
                })?;
            plaintext.extend_from_slice(&decrypted);
        }

        Ok(plaintext)
    }

    /// Signs the SHA-256 digest of `data`. Deterministic for a given key.
    pub fn sign(&self, data: &[u8], private_key: &PrivateKey) -> Result<String> {
        let digest = Sha256::digest(data);
        let signature = private_key
            .inner()
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| PaymentError::SignatureGenerationError(e.to_string()))?;
        Ok(STANDARD.encode(signature))
    }

    /// Checks a base64 `signature` over `data`. Any mismatch or malformed input is `false`.
    pub fn verify(&self, data: &[u8], signature: &str, public_key: &PublicKey) -> bool {
        let Ok(signature) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        let digest = Sha256::digest(data);
        public_key
            .inner()
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
            .is_ok()
    }
}
