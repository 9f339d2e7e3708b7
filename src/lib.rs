//! Client for a mobile-wallet payment gateway that only accepts sealed
//! (RSA-encrypted and signed) request payloads.
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`]: value objects, wire records, the checkout state machine and
//!   the [`domain::ports::GatewayTransport`] port.
//! - [`infrastructure`]: the RSA crypto engine, envelope sealing and the
//!   HTTP and scripted transports.
//! - [`application`]: the initiate → complete → verify flows.
//! - [`interfaces`]: parsing of the callback the gateway sends to the merchant.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

#[cfg(test)]
pub(crate) mod test_support;
