use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{CompanyId, ObligationId, ObligationStatus};
use super::domain::{ObligationDraft, ObligationUpdate};
use super::export::{export_csv, ComplianceReport, RiskReport};
use super::repository::{ObligationRepository, RepositoryError, TenantDirectory};
use super::service::{ObligationService, ObligationServiceError};

/// Shared state for the obligation endpoints: the service plus the sibling
/// directory the report headers read from.
pub struct ObligationRoutes<R, D> {
    pub service: Arc<ObligationService<R>>,
    pub directory: Arc<D>,
}

impl<R, D> Clone for ObligationRoutes<R, D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            directory: Arc::clone(&self.directory),
        }
    }
}

/// Router builder exposing CRUD, dashboard, export, and report endpoints.
pub fn obligation_router<R, D>(state: ObligationRoutes<R, D>) -> Router
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/companies/:company_id/obligations",
            post(create_handler::<R, D>).get(list_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/obligations/:obligation_id",
            get(get_handler::<R, D>)
                .put(update_handler::<R, D>)
                .delete(delete_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/obligations/:obligation_id/status",
            post(status_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/dashboard",
            get(dashboard_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/exports/csv",
            get(export_csv_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/exports/json",
            get(export_json_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/reports/compliance",
            get(compliance_report_handler::<R, D>),
        )
        .route(
            "/api/v1/companies/:company_id/reports/risk",
            get(risk_report_handler::<R, D>),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfQuery {
    /// Reporting date override; defaults to the local calendar date.
    pub(crate) today: Option<NaiveDate>,
}

impl AsOfQuery {
    fn resolve(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn error_response(error: ObligationServiceError) -> Response {
    let status = match &error {
        ObligationServiceError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ObligationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ObligationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ObligationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    axum::Json(draft): axum::Json<ObligationDraft>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    match state.service.create(&company, draft, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    match state.service.overview(&company, query.resolve()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path((_company_id, obligation_id)): Path<(String, String)>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    match state.service.get(&ObligationId(obligation_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path((_company_id, obligation_id)): Path<(String, String)>,
    axum::Json(update): axum::Json<ObligationUpdate>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    match state
        .service
        .update(&ObligationId(obligation_id), update, Utc::now())
    {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    pub(crate) status: ObligationStatus,
}

pub(crate) async fn status_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path((_company_id, obligation_id)): Path<(String, String)>,
    axum::Json(change): axum::Json<StatusChange>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    match state
        .service
        .set_status(&ObligationId(obligation_id), change.status, Utc::now())
    {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path((_company_id, obligation_id)): Path<(String, String)>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    match state.service.delete(&ObligationId(obligation_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    match state.service.dashboard(&company, query.resolve()) {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_csv_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    let today = query.resolve();
    let records = match state.service.list(&company) {
        Ok(records) => records,
        Err(error) => return error_response(error),
    };

    match export_csv(&records, today) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": format!("csv projection failed: {error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn export_json_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    match state.service.overview(&company, query.resolve()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn compliance_report_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    let today = query.resolve();
    let records = match state.service.list(&company) {
        Ok(records) => records,
        Err(error) => return error_response(error),
    };
    let profile = match state.directory.company_profile(&company) {
        Ok(profile) => profile,
        Err(error) => return error_response(ObligationServiceError::Repository(error)),
    };

    let report = ComplianceReport::build(&records, profile.as_ref(), today);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn risk_report_handler<R, D>(
    State(state): State<ObligationRoutes<R, D>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
{
    let company = CompanyId(company_id);
    let today = query.resolve();
    let records = match state.service.list(&company) {
        Ok(records) => records,
        Err(error) => return error_response(error),
    };
    let profile = match state.directory.company_profile(&company) {
        Ok(profile) => profile,
        Err(error) => return error_response(ObligationServiceError::Repository(error)),
    };

    let report = RiskReport::build(&records, profile.as_ref(), today);
    (StatusCode::OK, axum::Json(report)).into_response()
}
