//! Error and violation message tests for payout-contract

use payout_contract::{ContractConfig, ContractSuite, ContractViolation, PayoutError};

#[test]
fn test_config_error() {
    let error = PayoutError::config("AGENT_ID must not be empty");

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("Configuration error"),
        "Error message MUST contain 'Configuration error' - actual: {}",
        error_msg
    );
    assert!(
        error_msg.contains("AGENT_ID"),
        "Error message MUST name the offending variable - actual: {}",
        error_msg
    );
}

#[test]
fn test_not_json_violation() {
    let violation = ContractViolation::NotJson {
        content_type: "text/html; charset=utf-8".to_string(),
    };

    let msg = violation.to_string();
    assert!(
        msg.contains("text/html; charset=utf-8"),
        "Violation MUST contain the received content-type - actual: {}",
        msg
    );
}

#[test]
fn test_status_not_allowed_violation() {
    let violation = ContractViolation::StatusNotAllowed {
        field: "status.value".to_string(),
        got: "EXPIRED".to_string(),
        allowed: "CREATED, READY".to_string(),
    };

    assert_eq!(
        violation.to_string(),
        "field 'status.value': status 'EXPIRED' not in [CREATED, READY]"
    );
}

#[test]
fn test_unexpected_value_violation() {
    let violation =
        ContractViolation::unexpected_value("paymentId", "test-pay-1", "\"test-pay-2\"");

    let msg = violation.to_string();
    assert!(
        msg.contains("test-pay-1") && msg.contains("test-pay-2"),
        "Violation MUST contain expected and actual values - actual: {}",
        msg
    );
}

#[test]
fn test_negative_balance_violation() {
    let violation = ContractViolation::NegativeBalance {
        value: "-3.50".to_string(),
    };

    assert_eq!(
        violation.to_string(),
        "balance must be non-negative, got -3.50"
    );
}

#[test]
fn test_unexpected_status_violation() {
    let violation = ContractViolation::UnexpectedStatus { status: 204 };
    assert_eq!(violation.to_string(), "expected HTTP 200, got 204");
}

#[test]
fn test_violation_wraps_into_payout_error() {
    let error = PayoutError::from(ContractViolation::missing("balance.currency"));

    let msg = error.to_string();
    assert!(
        msg.starts_with("Contract violation"),
        "Wrapped violation MUST keep the 'Contract violation' prefix - actual: {}",
        msg
    );
    assert!(
        msg.contains("balance.currency"),
        "Wrapped violation MUST keep the field name - actual: {}",
        msg
    );
}

#[test]
fn test_invalid_base_url_rejected_by_suite() {
    let config = ContractConfig::default().with_base_url("mailto:ops@example.com");

    let error = ContractSuite::new(&config).unwrap_err();
    assert!(
        matches!(error, PayoutError::Config { .. }),
        "Non-http base URL MUST be a configuration error - actual: {:?}",
        error
    );
}

#[test]
fn test_error_debug_format() {
    let error = PayoutError::invalid_header("Authorization: failed to parse header value");

    let debug_str = format!("{:?}", error);
    assert!(
        debug_str.contains("InvalidHeader"),
        "Debug format MUST contain variant name 'InvalidHeader' - actual: {}",
        debug_str
    );
}
