//! Error types for the payout contract suite

use thiserror::Error;

/// Result type alias for payout contract operations
pub type Result<T> = std::result::Result<T, PayoutError>;

/// Main error type for payout contract operations
#[derive(Error, Debug)]
pub enum PayoutError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed URL
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Header value could not be built
    #[error("Invalid header: {message}")]
    InvalidHeader { message: String },

    /// A response broke the documented contract
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

impl PayoutError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }
}

/// A single broken assertion on a payout API response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// Content-type did not contain `application/json`
    #[error("expected JSON content-type, got '{content_type}'")]
    NotJson { content_type: String },

    /// Body was labelled JSON but did not parse
    #[error("body is not valid JSON: {message}")]
    MalformedBody { message: String },

    /// Required field absent
    #[error("missing field '{field}'")]
    MissingField { field: String },

    /// Field present with the wrong JSON type
    #[error("field '{field}' must be {expected}")]
    WrongType { field: String, expected: String },

    /// Field present with a value other than the one submitted
    #[error("field '{field}': expected {expected}, got {got}")]
    UnexpectedValue {
        field: String,
        expected: String,
        got: String,
    },

    /// Status value outside the set allowed for this endpoint
    #[error("field '{field}': status '{got}' not in [{allowed}]")]
    StatusNotAllowed {
        field: String,
        got: String,
        allowed: String,
    },

    /// Balance parsed but below zero
    #[error("balance must be non-negative, got {value}")]
    NegativeBalance { value: String },

    /// Decimal string did not parse
    #[error("field '{field}' is not a decimal: '{value}'")]
    InvalidDecimal { field: String, value: String },

    /// Non-error HTTP status other than 200
    #[error("expected HTTP 200, got {status}")]
    UnexpectedStatus { status: u16 },
}

impl ContractViolation {
    /// Create a missing field violation
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a wrong type violation
    pub fn wrong_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::WrongType {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Create an unexpected value violation
    pub fn unexpected_value(
        field: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self::UnexpectedValue {
            field: field.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }
}
