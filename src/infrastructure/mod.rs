//! Adapters: RSA sealing and the concrete gateway transports.

pub mod crypto;
pub mod envelope;
pub mod http;
pub mod scripted;
