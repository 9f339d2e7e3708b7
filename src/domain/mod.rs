//! Domain layer: value objects, wire records and the transport port.
//!
//! Key material is parsed here. Nothing here performs I/O, encryption or
//! signing; those live behind the `GatewayTransport` port and in the
//! infrastructure layer.

pub mod checkout;
pub mod config;
pub mod keys;
pub mod payload;
pub mod ports;
pub mod transaction;
pub mod verification;
