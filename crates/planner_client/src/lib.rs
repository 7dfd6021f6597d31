use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ServiceErrorBody,
    protocol::{VacationRequest, VacationResponse},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod error;

pub use error::{PlanErrorKind, PlanRequestError};

/// Planning endpoint the desktop app talks to unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "https://vacation-ai-backend.onrender.com/ai/ask";

/// Anything that can turn a validated request into a vacation plan.
#[async_trait]
pub trait PlanService: Send + Sync {
    async fn request_plan(
        &self,
        request: &VacationRequest,
    ) -> Result<VacationResponse, PlanRequestError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    /// `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct PlannerClient {
    http: Client,
    endpoint: Url,
}

impl PlannerClient {
    pub fn new(config: ClientConfig) -> Result<Self, PlanRequestError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(PlanRequestError::ClientBuild)?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts the request once and decodes the plan. No retries.
    pub async fn plan(
        &self,
        request: &VacationRequest,
    ) -> Result<VacationResponse, PlanRequestError> {
        info!(
            endpoint = %self.endpoint,
            destination = %request.destination,
            reason = %request.reason,
            "requesting vacation plan"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(PlanRequestError::from_send)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(PlanRequestError::from_send)?;
        debug!(status = status.as_u16(), bytes = body.len(), "planning service replied");

        if !status.is_success() {
            let message = ServiceErrorBody::from_body(&body)
                .and_then(|parsed| parsed.summary().map(str::to_string));
            warn!(status = status.as_u16(), ?message, "planning service rejected request");
            return Err(PlanRequestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        decode_plan(&body)
    }
}

#[async_trait]
impl PlanService for PlannerClient {
    async fn request_plan(
        &self,
        request: &VacationRequest,
    ) -> Result<VacationResponse, PlanRequestError> {
        self.plan(request).await
    }
}

fn decode_plan(body: &str) -> Result<VacationResponse, PlanRequestError> {
    let plan: VacationResponse = serde_json::from_str(body)
        .map_err(|err| PlanRequestError::MalformedResponse(err.to_string()))?;
    if plan.vacation.trim().is_empty() {
        return Err(PlanRequestError::EmptyPlan);
    }
    Ok(plan)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
