use crate::error::{PaymentError, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest order id the gateway accepts.
pub const MAX_INVOICE_LEN: usize = 20;
/// Length of the merchant-side challenge sent with every initiate call.
pub const CHALLENGE_LEN: usize = 40;
/// ISO 4217 numeric code for BDT, the only currency the gateway settles.
pub const CURRENCY_CODE: &str = "050";

/// Asia/Dhaka is UTC+06:00 all year round.
const DHAKA_OFFSET_SECS: i32 = 6 * 3600;

/// Represents a positive monetary amount with at most 2 decimal places.
///
/// Serialized as a string, exactly as the gateway expects it inside the sealed payload.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }
        if value.scale() > 2 {
            return Err(PaymentError::ValidationError(
                "Amount must have at most 2 decimal places".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim()).map_err(|_| {
            PaymentError::ValidationError(format!("'{}' is not a decimal amount", s))
        })?;
        Self::new(value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Merchant-supplied order id, unique per merchant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.len() > MAX_INVOICE_LEN {
            return Err(PaymentError::ValidationError(format!(
                "Invoice number must be 1-{} characters long",
                MAX_INVOICE_LEN
            )));
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PaymentError::ValidationError(format!(
                "Invoice number '{}' may only contain ASCII letters and digits",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated checkout request. Consumed once by the initiator.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub amount: Amount,
    pub invoice_number: InvoiceNumber,
}

impl TransactionRequest {
    pub fn new(amount: &str, invoice_number: &str) -> Result<Self> {
        Ok(Self {
            amount: amount.parse()?,
            invoice_number: InvoiceNumber::new(invoice_number)?,
        })
    }
}

/// Single-use token binding a payment reference to one initiate call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Challenge(String);

impl Challenge {
    /// Generates a fresh lowercase challenge for an initiate call.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let token = (0..CHALLENGE_LEN)
            .map(|_| rng.gen_range(b'a'..=b'z') as char)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Challenge {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Challenges authorize the complete call; keep them out of logs.
impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Challenge(..)")
    }
}

/// Gateway-issued key addressing one transaction through complete and verify.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReferenceId(String);

impl PaymentReferenceId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(PaymentError::ValidationError(format!(
                "'{}' is not a valid payment reference id",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current time in the gateway's `YYYYMMDDHHMMSS` format, Asia/Dhaka local time.
pub fn gateway_timestamp() -> String {
    format_gateway_timestamp(Utc::now())
}

pub fn format_gateway_timestamp(now: DateTime<Utc>) -> String {
    let dhaka = FixedOffset::east_opt(DHAKA_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&dhaka).format("%Y%m%d%H%M%S").to_string()
}
