//! LLM insight orchestration: input sanitization, per-user rate limiting,
//! prompt assembly, and the opaque gateway seam. The hosted model itself is
//! an external collaborator.

pub mod prompts;
pub mod rate_limit;
pub mod router;
pub mod sanitize;
pub mod service;

pub use prompts::{build_prompt, InsightKind, InsightPrompt};
pub use rate_limit::{RateLimitExceeded, SlidingWindowLimiter};
pub use router::{insight_router, InsightRoutes};
pub use sanitize::{
    sanitize_company, sanitize_obligation, sanitize_text, SanitizedCompany, SanitizedObligation,
};
pub use service::{
    GatewayError, InsightError, InsightGateway, InsightRequest, InsightResponse, InsightService,
};
