//! Wire types for the payout API

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Prefix of generated payment identifiers
pub const PAYMENT_ID_PREFIX: &str = "test-pay-";

/// Provider code used by the lifecycle scenario
pub const DEFAULT_PROVIDER_CODE: &str = "qiwi-wallet";

/// Recipient account used by the lifecycle scenario
pub const DEFAULT_ACCOUNT: &str = "79123456789";

/// Monetary amount as carried on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal string, e.g. "1.00"
    pub value: String,
    /// ISO 4217 currency code
    pub currency: String,
}

impl Money {
    /// Create a new amount
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }

    /// Amount in roubles
    pub fn rub(value: impl Into<String>) -> Self {
        Self::new(value, "RUB")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Who receives a payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDetails {
    /// Provider code, e.g. "qiwi-wallet"
    pub provider_code: String,
    /// Provider-specific fields such as `account`
    pub fields: HashMap<String, String>,
}

impl RecipientDetails {
    /// Recipient addressed by a single `account` field
    pub fn account(provider_code: impl Into<String>, account: impl Into<String>) -> Self {
        let mut fields = HashMap::new();
        fields.insert("account".to_string(), account.into());
        Self {
            provider_code: provider_code.into(),
            fields,
        }
    }
}

/// Body of a create-payment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub recipient_details: RecipientDetails,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl PaymentRequest {
    /// Create a new payment request
    pub fn new(recipient_details: RecipientDetails, amount: Money) -> Self {
        Self {
            recipient_details,
            amount,
            comment: None,
        }
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The 1 RUB wallet payout submitted by the lifecycle scenario
    pub fn test_payment() -> Self {
        Self::new(
            RecipientDetails::account(DEFAULT_PROVIDER_CODE, DEFAULT_ACCOUNT),
            Money::rub("1.00"),
        )
        .with_comment("Test payment 1 RUB")
    }
}

/// Lifecycle status of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Created,
    Ready,
    Failed,
    InProgress,
    Completed,
    Expired,
    Processing,
}

impl PaymentStatus {
    /// Every status the API documents
    pub const ALL: [PaymentStatus; 7] = [
        PaymentStatus::Created,
        PaymentStatus::Ready,
        PaymentStatus::Failed,
        PaymentStatus::InProgress,
        PaymentStatus::Completed,
        PaymentStatus::Expired,
        PaymentStatus::Processing,
    ];

    /// Statuses the payments list may report
    pub const LISTED: [PaymentStatus; 6] = [
        PaymentStatus::Created,
        PaymentStatus::Ready,
        PaymentStatus::Failed,
        PaymentStatus::InProgress,
        PaymentStatus::Completed,
        PaymentStatus::Expired,
    ];

    /// Statuses a freshly created payment may report
    pub const AFTER_CREATE: [PaymentStatus; 2] = [PaymentStatus::Created, PaymentStatus::Ready];

    /// Statuses an executed payment may report
    pub const AFTER_EXECUTE: [PaymentStatus; 3] = [
        PaymentStatus::InProgress,
        PaymentStatus::Completed,
        PaymentStatus::Processing,
    ];

    /// Get the wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "CREATED",
            PaymentStatus::Ready => "READY",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::InProgress => "IN_PROGRESS",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Expired => "EXPIRED",
            PaymentStatus::Processing => "PROCESSING",
        }
    }

    /// Whether execute may be called on a payment in this status
    pub fn can_execute(&self) -> bool {
        matches!(self, PaymentStatus::Created | PaymentStatus::Ready)
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::Failed | PaymentStatus::Expired
        )
    }

    /// Whether `next` is a legal transition from this status
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        self.can_execute() && Self::AFTER_EXECUTE.contains(&next)
            || matches!(
                (self, next),
                (PaymentStatus::InProgress | PaymentStatus::Processing, PaymentStatus::Completed)
            )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PaymentStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown payment status: {}", s))
    }
}

/// Failure body returned with HTTP status >= 400
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Machine-readable error code
    pub error_code: String,
    /// Service that produced the error
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.error_code, self.service_name)?;
        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

/// Identifiers shared by every scenario of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    agent_id: String,
    point_id: String,
    payment_id: String,
}

impl TestContext {
    /// Create a context with a payment id derived from the current time
    pub fn new(agent_id: impl Into<String>, point_id: impl Into<String>) -> Self {
        Self::with_payment_id(agent_id, point_id, generate_payment_id())
    }

    /// Create a context with a fixed payment id
    pub fn with_payment_id(
        agent_id: impl Into<String>,
        point_id: impl Into<String>,
        payment_id: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            point_id: point_id.into(),
            payment_id: payment_id.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn point_id(&self) -> &str {
        &self.point_id
    }

    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }
}

/// `test-pay-<unix millis>`
pub fn generate_payment_id() -> String {
    format!("{}{}", PAYMENT_ID_PREFIX, Utc::now().timestamp_millis())
}
