//! Response contract validation
//!
//! Every payout endpoint answers under the same policy:
//!
//! 1. The content-type must contain `application/json`. Anything else is
//!    recorded as an error annotation and fails the check outright.
//! 2. A status of 400 or above must carry the error envelope (`errorCode` as a
//!    string plus `serviceName`). A well-formed envelope ends validation with
//!    [`Verdict::ApiError`], which is not a failure.
//! 3. On 200 the body must satisfy the endpoint-specific shape checked by one
//!    of the `check_*` functions. Other non-error statuses are governed by
//!    [`SuccessStatus`]: balance, create and execute require exactly 200, the
//!    payments list only inspects a 200 body.

use crate::client::ApiResponse;
use crate::error::ContractViolation;
use crate::types::{ErrorEnvelope, Money, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

type CheckResult<T = ()> = std::result::Result<T, ContractViolation>;

/// Kind of a scenario annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Error,
    Warning,
}

/// Diagnostic note attached to a scenario outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub description: String,
}

impl Annotation {
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            kind: AnnotationKind::Error,
            description: description.into(),
        }
    }

    pub fn warning(description: impl Into<String>) -> Self {
        Self {
            kind: AnnotationKind::Warning,
            description: description.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AnnotationKind::Error => "error",
            AnnotationKind::Warning => "warning",
        };
        write!(f, "[{}] {}", kind, self.description)
    }
}

/// Result of validating one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Success path satisfied the contract
    Passed,
    /// API reported an error with a well-formed envelope
    ApiError(ErrorEnvelope),
    /// The response broke the contract
    Violated(ContractViolation),
    /// No response was received
    Transport(String),
}

impl Verdict {
    /// Whether this verdict fails the scenario
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Violated(_) | Verdict::Transport(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => f.write_str("passed"),
            Verdict::ApiError(envelope) => write!(f, "api error ({})", envelope),
            Verdict::Violated(violation) => write!(f, "violated: {}", violation),
            Verdict::Transport(message) => write!(f, "transport failure: {}", message),
        }
    }
}

/// Verdict plus the annotations gathered on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub verdict: Verdict,
    pub annotations: Vec<Annotation>,
}

impl Validation {
    fn new(verdict: Verdict, annotations: Vec<Annotation>) -> Self {
        Self {
            verdict,
            annotations,
        }
    }
}

/// Treatment of a non-error status other than 200
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessStatus {
    /// Anything but 200 violates the contract
    Require200,
    /// The body is checked on 200 only; other statuses pass unchecked
    CheckOn200,
}

/// Apply the shared policy, then `success` on a 200 body
pub fn validate<F>(response: &ApiResponse, success: F) -> Validation
where
    F: FnOnce(&Value, &mut Vec<Annotation>) -> CheckResult,
{
    validate_with(response, SuccessStatus::Require200, success)
}

/// Like [`validate`], with an explicit policy for non-200 success statuses
pub fn validate_with<F>(response: &ApiResponse, policy: SuccessStatus, success: F) -> Validation
where
    F: FnOnce(&Value, &mut Vec<Annotation>) -> CheckResult,
{
    let mut annotations = Vec::new();

    if !response.is_json() {
        annotations.push(Annotation::error(format!(
            "Expected JSON, got {}: {}",
            response.content_type, response.body
        )));
        let violation = ContractViolation::NotJson {
            content_type: response.content_type.clone(),
        };
        return Validation::new(Verdict::Violated(violation), annotations);
    }

    let body = match response.json() {
        Ok(body) => body,
        Err(violation) => return Validation::new(Verdict::Violated(violation), annotations),
    };

    if response.is_error() {
        let verdict = match check_error_envelope(&body) {
            Ok(envelope) => Verdict::ApiError(envelope),
            Err(violation) => Verdict::Violated(violation),
        };
        return Validation::new(verdict, annotations);
    }

    if response.status != 200 {
        let verdict = match policy {
            SuccessStatus::Require200 => Verdict::Violated(ContractViolation::UnexpectedStatus {
                status: response.status,
            }),
            SuccessStatus::CheckOn200 => Verdict::Passed,
        };
        return Validation::new(verdict, annotations);
    }

    let verdict = match success(&body, &mut annotations) {
        Ok(()) => Verdict::Passed,
        Err(violation) => Verdict::Violated(violation),
    };
    Validation::new(verdict, annotations)
}

/// Require `errorCode` (string) and `serviceName`
pub fn check_error_envelope(body: &Value) -> CheckResult<ErrorEnvelope> {
    let error_code = require_str(body, "errorCode")?.to_string();
    let service_name = match require(body, "serviceName")? {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };

    Ok(ErrorEnvelope {
        error_code,
        service_name,
        description: optional_str(body, "description"),
        user_message: optional_str(body, "userMessage"),
        trace_id: optional_str(body, "traceId"),
    })
}

/// Payments list: a sequence whose first element has an id and a listed status
pub fn check_payments_list(body: &Value) -> CheckResult {
    let payments = body
        .as_array()
        .ok_or_else(|| ContractViolation::wrong_type("$", "an array"))?;

    if let Some(first) = payments.first() {
        require(first, "paymentId").map_err(|_| ContractViolation::missing("[0].paymentId"))?;
        check_status(first, "[0].status", &PaymentStatus::LISTED)?;
    }

    Ok(())
}

/// Balance: `balance.value` is a non-negative decimal and `balance.currency` is present.
/// A zero balance only adds a warning.
pub fn check_balance(body: &Value, annotations: &mut Vec<Annotation>) -> CheckResult<Decimal> {
    let balance = require(body, "balance")?;
    let value = require(balance, "value").map_err(|_| ContractViolation::missing("balance.value"))?;
    require(balance, "currency").map_err(|_| ContractViolation::missing("balance.currency"))?;

    let raw = match value {
        Value::String(raw) => raw.clone(),
        Value::Number(number) => number.to_string(),
        _ => return Err(ContractViolation::wrong_type("balance.value", "a decimal string")),
    };
    let amount = Decimal::from_str(raw.trim()).map_err(|_| ContractViolation::InvalidDecimal {
        field: "balance.value".to_string(),
        value: raw.clone(),
    })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ContractViolation::NegativeBalance { value: raw });
    }

    if amount.is_zero() {
        annotations.push(Annotation::warning(
            "Balance is 0. In production, it should be > 0.",
        ));
    }

    Ok(amount)
}

/// Created payment: echoes the id and amount, status CREATED or READY
pub fn check_created_payment(
    body: &Value,
    expected_id: &str,
    expected_amount: &Money,
) -> CheckResult<PaymentStatus> {
    let payment_id = require(body, "paymentId")?;
    if payment_id.as_str() != Some(expected_id) {
        return Err(ContractViolation::unexpected_value(
            "paymentId",
            expected_id,
            payment_id.to_string(),
        ));
    }

    let amount = require(body, "amount")?;
    let expected = serde_json::json!({
        "value": expected_amount.value,
        "currency": expected_amount.currency,
    });
    if *amount != expected {
        return Err(ContractViolation::unexpected_value(
            "amount",
            expected.to_string(),
            amount.to_string(),
        ));
    }

    check_status(body, "status", &PaymentStatus::AFTER_CREATE)
}

/// Executed payment: status IN_PROGRESS, COMPLETED or PROCESSING
pub fn check_executed_payment(body: &Value) -> CheckResult<PaymentStatus> {
    check_status(body, "status", &PaymentStatus::AFTER_EXECUTE)
}

/// Read `<object>.status.value` and require it in `allowed`
fn check_status(object: &Value, field: &str, allowed: &[PaymentStatus]) -> CheckResult<PaymentStatus> {
    let status = object
        .get("status")
        .ok_or_else(|| ContractViolation::missing(field))?;
    let value_field = format!("{}.value", field);
    let raw = status
        .get("value")
        .ok_or_else(|| ContractViolation::missing(value_field.as_str()))?
        .as_str()
        .ok_or_else(|| ContractViolation::wrong_type(value_field.as_str(), "a string"))?;

    match PaymentStatus::from_str(raw) {
        Ok(parsed) if allowed.contains(&parsed) => Ok(parsed),
        _ => Err(ContractViolation::StatusNotAllowed {
            field: value_field,
            got: raw.to_string(),
            allowed: allowed
                .iter()
                .map(PaymentStatus::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

fn require<'a>(object: &'a Value, field: &str) -> CheckResult<&'a Value> {
    object
        .get(field)
        .ok_or_else(|| ContractViolation::missing(field))
}

fn require_str<'a>(object: &'a Value, field: &str) -> CheckResult<&'a str> {
    require(object, field)?
        .as_str()
        .ok_or_else(|| ContractViolation::wrong_type(field, "a string"))
}

fn optional_str(object: &Value, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_string)
}
