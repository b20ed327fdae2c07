use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{CompanyProfile, Obligation};
use super::prompts::{build_prompt, InsightKind, InsightPrompt};
use super::rate_limit::{RateLimitExceeded, SlidingWindowLimiter};
use super::sanitize::{sanitize_company, sanitize_obligation};

/// Opaque text-generation seam over the hosted LLM gateway.
pub trait InsightGateway: Send + Sync {
    fn generate(&self, prompt: &InsightPrompt) -> Result<String, GatewayError>;
}

/// Upstream gateway failures; surfaced as transient notifications, never
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("insight gateway rate limited the request")]
    RateLimited,
    #[error("insight gateway credits exhausted")]
    CreditsExhausted,
    #[error("insight gateway unavailable: {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightRequest {
    pub kind: InsightKind,
    /// Authenticated user the sliding-window limit is keyed on.
    pub requested_by: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightResponse {
    pub insight: String,
    pub kind: InsightKind,
    pub generated_at: DateTime<Utc>,
}

/// Orchestrates one insight call: rate limit, sanitize, assemble the prompt,
/// invoke the gateway.
pub struct InsightService<G> {
    gateway: Arc<G>,
    limiter: SlidingWindowLimiter,
}

impl<G> InsightService<G>
where
    G: InsightGateway + 'static,
{
    pub fn new(gateway: Arc<G>, requests_per_minute: u32) -> Self {
        Self {
            gateway,
            limiter: SlidingWindowLimiter::per_minute(requests_per_minute),
        }
    }

    pub fn generate(
        &self,
        request: &InsightRequest,
        obligations: &[Obligation],
        company: Option<&CompanyProfile>,
        now: DateTime<Utc>,
    ) -> Result<InsightResponse, InsightError> {
        self.limiter.check(&request.requested_by, now)?;

        let sanitized: Vec<_> = obligations.iter().map(sanitize_obligation).collect();
        let sanitized_company = company.map(sanitize_company);

        let prompt = build_prompt(request.kind, &sanitized, sanitized_company.as_ref())?;
        let insight = self.gateway.generate(&prompt)?;

        Ok(InsightResponse {
            insight,
            kind: request.kind,
            generated_at: now,
        })
    }
}

/// Error raised by the insight service.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),
    #[error("prompt assembly failed: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
