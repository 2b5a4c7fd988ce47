//! # payout-contract
//!
//! End-to-end contract tests for the QIWI payout HTTP API. Each scenario
//! issues one request against the configured point (balance, payment list,
//! payment creation, payment execution) and checks the response against the
//! documented shape: JSON content-type, the error envelope on failure
//! statuses, and endpoint-specific fields and status values on success.

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod scenario;
pub mod types;

// Re-exports for convenience
pub use client::{ApiResponse, PayoutClient};
pub use config::ContractConfig;
pub use contract::{Annotation, AnnotationKind, SuccessStatus, Validation, Verdict};
pub use error::{ContractViolation, PayoutError, Result};
pub use scenario::{ContractSuite, Scenario, ScenarioOutcome, SuiteReport};
pub use types::*;

/// Current version of the payout-contract library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
