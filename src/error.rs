use thiserror::Error;

/// Classified failure of a gateway HTTP call.
///
/// Kept apart from `PaymentError` so callers can always tell a transport
/// timeout from a cryptographic or business-level rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("gateway responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode gateway response: {0}")]
    Decode(String),
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Timeouts, connection failures and 5xx responses may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Timeout { .. } | TransportError::Connect { .. } => true,
            TransportError::Status { status, .. } => *status >= 500,
            TransportError::Decode(_) | TransportError::Other(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Encryption error: {0}")]
    EncryptionError(String),
    #[error("Decryption error: {0}")]
    DecryptionError(String),
    #[error("Signature generation error: {0}")]
    SignatureGenerationError(String),
    #[error("Request error: {0}")]
    RequestError(#[from] TransportError),
    #[error("Payment initiation error: {message}")]
    PaymentInitiationError {
        message: String,
        #[source]
        source: Option<Box<PaymentError>>,
    },
    #[error("Payment complete error: {message}")]
    PaymentCompleteError {
        message: String,
        #[source]
        source: Option<Box<PaymentError>>,
    },
    #[error("Payment verification error: {message}")]
    PaymentVerificationError {
        message: String,
        #[source]
        source: Option<Box<PaymentError>>,
    },
    #[error("Checkout process error: {0}")]
    CheckProcessError(String),
}

impl PaymentError {
    pub fn initiation(message: impl Into<String>, source: Option<PaymentError>) -> Self {
        PaymentError::PaymentInitiationError {
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    pub fn complete(message: impl Into<String>, source: Option<PaymentError>) -> Self {
        PaymentError::PaymentCompleteError {
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    pub fn verification(message: impl Into<String>, source: Option<PaymentError>) -> Self {
        PaymentError::PaymentVerificationError {
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    /// Returns the transport failure behind this error, looking through stage wrappers.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            PaymentError::RequestError(e) => Some(e),
            PaymentError::PaymentInitiationError { source, .. }
            | PaymentError::PaymentCompleteError { source, .. }
            | PaymentError::PaymentVerificationError { source, .. } => {
                source.as_deref().and_then(PaymentError::transport_error)
            }
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.transport_error()
            .is_some_and(TransportError::is_retryable)
    }

    /// Short, stable name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentError::ConfigError(_) => "config",
            PaymentError::ValidationError(_) => "validation",
            PaymentError::EncryptionError(_) => "encryption",
            PaymentError::DecryptionError(_) => "decryption",
            PaymentError::SignatureGenerationError(_) => "signature_generation",
            PaymentError::RequestError(_) => "request",
            PaymentError::PaymentInitiationError { .. } => "payment_initiation",
            PaymentError::PaymentCompleteError { .. } => "payment_complete",
            PaymentError::PaymentVerificationError { .. } => "payment_verification",
            PaymentError::CheckProcessError(_) => "check_process",
        }
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
