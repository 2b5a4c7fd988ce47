//! Contract scenarios and the suite runner

use crate::client::{ApiResponse, PayoutClient};
use crate::config::ContractConfig;
use crate::contract::{self, Annotation, AnnotationKind, SuccessStatus, Validation, Verdict};
use crate::types::{PaymentRequest, TestContext};
use crate::Result;
use std::fmt;
use tracing::{error, info, warn};

/// Page size requested by the list scenario
pub const LIST_LIMIT: u32 = 1;

/// One request/assert scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    ListPayments,
    GetBalance,
    CreatePayment,
    ExecutePayment,
}

impl Scenario {
    /// Run order; execute must follow create
    pub const ALL: [Scenario; 4] = [
        Scenario::ListPayments,
        Scenario::GetBalance,
        Scenario::CreatePayment,
        Scenario::ExecutePayment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ListPayments => "list payments",
            Scenario::GetBalance => "get balance",
            Scenario::CreatePayment => "create payment",
            Scenario::ExecutePayment => "execute payment",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened when a scenario ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    /// HTTP status, absent when the request never completed
    pub http_status: Option<u16>,
    pub verdict: Verdict,
    pub annotations: Vec<Annotation>,
}

impl ScenarioOutcome {
    fn from_validation(scenario: Scenario, status: u16, validation: Validation) -> Self {
        Self {
            scenario,
            http_status: Some(status),
            verdict: validation.verdict,
            annotations: validation.annotations,
        }
    }

    fn transport(scenario: Scenario, message: String) -> Self {
        Self {
            scenario,
            http_status: None,
            verdict: Verdict::Transport(message),
            annotations: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.verdict.is_failure()
    }
}

/// Outcomes of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub payment_id: String,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    /// True when no scenario failed
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| !outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }

    /// Warning annotations across all scenarios
    pub fn warnings(&self) -> impl Iterator<Item = (Scenario, &Annotation)> {
        self.outcomes.iter().flat_map(|outcome| {
            outcome
                .annotations
                .iter()
                .filter(|annotation| annotation.kind == AnnotationKind::Warning)
                .map(move |annotation| (outcome.scenario, annotation))
        })
    }

    pub fn outcome(&self, scenario: Scenario) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|outcome| outcome.scenario == scenario)
    }
}

/// Runs the four scenarios against one payout point
#[derive(Debug, Clone)]
pub struct ContractSuite {
    client: PayoutClient,
    context: TestContext,
    payment: PaymentRequest,
}

impl ContractSuite {
    /// Create a suite with a freshly generated payment id
    pub fn new(config: &ContractConfig) -> Result<Self> {
        let context = TestContext::new(config.agent_id.clone(), config.point_id.clone());
        Self::with_context(config, context)
    }

    /// Create a suite with an explicit context
    pub fn with_context(config: &ContractConfig, context: TestContext) -> Result<Self> {
        Ok(Self {
            client: PayoutClient::new(config)?,
            context,
            payment: PaymentRequest::test_payment(),
        })
    }

    /// Replace the payment submitted by the create scenario
    pub fn with_payment(mut self, payment: PaymentRequest) -> Self {
        self.payment = payment;
        self
    }

    pub fn context(&self) -> &TestContext {
        &self.context
    }

    pub fn payment(&self) -> &PaymentRequest {
        &self.payment
    }

    /// Run every scenario in order
    pub async fn run(&self) -> SuiteReport {
        info!(
            "Running payout contract suite for agent {} point {} (payment {})",
            self.context.agent_id(),
            self.context.point_id(),
            self.context.payment_id()
        );

        let mut outcomes = Vec::with_capacity(Scenario::ALL.len());
        for scenario in Scenario::ALL {
            outcomes.push(self.run_scenario(scenario).await);
        }

        SuiteReport {
            payment_id: self.context.payment_id().to_string(),
            outcomes,
        }
    }

    /// Run a single scenario
    pub async fn run_scenario(&self, scenario: Scenario) -> ScenarioOutcome {
        let response = match scenario {
            Scenario::ListPayments => self.client.list_payments(&self.context, LIST_LIMIT).await,
            Scenario::GetBalance => self.client.get_balance(&self.context).await,
            Scenario::CreatePayment => {
                self.client
                    .create_payment(&self.context, &self.payment)
                    .await
            }
            Scenario::ExecutePayment => self.client.execute_payment(&self.context).await,
        };

        let outcome = match response {
            Ok(response) => {
                let validation = self.validate(scenario, &response);
                ScenarioOutcome::from_validation(scenario, response.status, validation)
            }
            Err(e) => ScenarioOutcome::transport(scenario, e.to_string()),
        };

        log_outcome(&outcome);
        outcome
    }

    fn validate(&self, scenario: Scenario, response: &ApiResponse) -> Validation {
        match scenario {
            Scenario::ListPayments => contract::validate_with(
                response,
                SuccessStatus::CheckOn200,
                |body, _| contract::check_payments_list(body),
            ),
            Scenario::GetBalance => contract::validate(response, |body, annotations| {
                contract::check_balance(body, annotations).map(|_| ())
            }),
            Scenario::CreatePayment => contract::validate(response, |body, _| {
                contract::check_created_payment(
                    body,
                    self.context.payment_id(),
                    &self.payment.amount,
                )
                .map(|_| ())
            }),
            Scenario::ExecutePayment => contract::validate(response, |body, _| {
                contract::check_executed_payment(body).map(|_| ())
            }),
        }
    }
}

fn log_outcome(outcome: &ScenarioOutcome) {
    let status = outcome
        .http_status
        .map(|status| status.to_string())
        .unwrap_or_else(|| "-".to_string());

    if outcome.is_failure() {
        error!("{} [{}]: {}", outcome.scenario, status, outcome.verdict);
    } else {
        info!("{} [{}]: {}", outcome.scenario, status, outcome.verdict);
    }

    for annotation in &outcome.annotations {
        warn!("{}: {}", outcome.scenario, annotation);
    }
}
