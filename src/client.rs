//! HTTP client for the payout API

use crate::config::ContractConfig;
use crate::types::{PaymentRequest, TestContext};
use crate::{ContractViolation, PayoutError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

/// Raw outcome of one payout API call, read fully before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// `content-type` header, empty when absent
    pub content_type: String,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    /// Build a response by hand
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    async fn read(response: Response) -> Result<Self> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    /// Whether the content-type advertises JSON
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }

    /// Whether the API reported an error
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Parse the body as JSON
    pub fn json(&self) -> std::result::Result<Value, ContractViolation> {
        serde_json::from_str(&self.body).map_err(|e| ContractViolation::MalformedBody {
            message: e.to_string(),
        })
    }
}

/// Client for the four payout endpoints
#[derive(Debug, Clone)]
pub struct PayoutClient {
    client: Client,
    base_url: Url,
}

impl PayoutClient {
    /// Create a new client with bearer and accept headers on every request
    pub fn new(config: &ContractConfig) -> Result<Self> {
        config.validate()?;

        if config.token.is_empty() {
            warn!("QIWI_TOKEN is not set; expecting the API to answer with its error envelope");
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| PayoutError::invalid_header(format!("Authorization: {}", e)))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PayoutError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.parsed_base_url()?,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve endpoint path segments against the base URL
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PayoutError::config(format!("Base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn point_endpoint(&self, context: &TestContext, rest: &[&str]) -> Result<Url> {
        let mut segments = vec![
            "v1",
            "agents",
            context.agent_id(),
            "points",
            context.point_id(),
        ];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    /// GET the most recent payments of a point
    pub async fn list_payments(&self, context: &TestContext, limit: u32) -> Result<ApiResponse> {
        let url = self.point_endpoint(context, &["payments"])?;
        let request = self
            .client
            .get(url.clone())
            .query(&[("limit", limit.to_string())]);
        self.send(Method::GET, &url, request).await
    }

    /// GET the balance of a point
    pub async fn get_balance(&self, context: &TestContext) -> Result<ApiResponse> {
        let url = self.point_endpoint(context, &["balance"])?;
        let request = self.client.get(url.clone());
        self.send(Method::GET, &url, request).await
    }

    /// PUT a new payment under the context's payment id
    pub async fn create_payment(
        &self,
        context: &TestContext,
        payment: &PaymentRequest,
    ) -> Result<ApiResponse> {
        let url = self.point_endpoint(context, &["payments", context.payment_id()])?;
        let request = self.client.put(url.clone()).json(payment);
        self.send(Method::PUT, &url, request).await
    }

    /// POST execute for the context's payment id
    pub async fn execute_payment(&self, context: &TestContext) -> Result<ApiResponse> {
        let url = self.point_endpoint(context, &["payments", context.payment_id(), "execute"])?;
        let request = self.client.post(url.clone());
        self.send(Method::POST, &url, request).await
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse> {
        debug!("{} {}", method, url);

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            PayoutError::from(e)
        })?;
        let response = ApiResponse::read(response).await?;

        info!(
            "{} {} -> {} ({})",
            method, url, response.status, response.content_type
        );
        Ok(response)
    }
}
