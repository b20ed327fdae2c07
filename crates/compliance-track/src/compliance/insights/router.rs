use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::super::domain::CompanyId;
use super::super::obligations::repository::{ObligationRepository, TenantDirectory};
use super::service::{GatewayError, InsightError, InsightGateway, InsightRequest, InsightService};

/// State for the insight endpoint: the orchestration service plus the store
/// accessors that supply the tenant's obligations and profile.
pub struct InsightRoutes<R, D, G> {
    pub service: Arc<InsightService<G>>,
    pub repository: Arc<R>,
    pub directory: Arc<D>,
}

impl<R, D, G> Clone for InsightRoutes<R, D, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
        }
    }
}

pub fn insight_router<R, D, G>(state: InsightRoutes<R, D, G>) -> Router
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
    G: InsightGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/companies/:company_id/insights",
            post(generate_handler::<R, D, G>),
        )
        .with_state(state)
}

pub(crate) async fn generate_handler<R, D, G>(
    State(state): State<InsightRoutes<R, D, G>>,
    Path(company_id): Path<String>,
    axum::Json(request): axum::Json<InsightRequest>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
    G: InsightGateway + 'static,
{
    let company = CompanyId(company_id);
    let obligations = match state.repository.list_for_company(&company) {
        Ok(records) => records,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };
    let profile = match state.directory.company_profile(&company) {
        Ok(profile) => profile,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match state
        .service
        .generate(&request, &obligations, profile.as_ref(), Utc::now())
    {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => {
            let status = match &error {
                InsightError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                InsightError::Gateway(GatewayError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
                InsightError::Gateway(GatewayError::CreditsExhausted) => {
                    StatusCode::PAYMENT_REQUIRED
                }
                InsightError::Gateway(GatewayError::Upstream(_)) => StatusCode::BAD_GATEWAY,
                InsightError::Prompt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let payload = json!({ "error": error.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}
