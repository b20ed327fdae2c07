use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use compliance_track::compliance::insights::{insight_router, InsightGateway, InsightRoutes};
use compliance_track::compliance::notifications::{DeadlineDigestService, DigestSender};
use compliance_track::compliance::obligations::{
    obligation_router, ObligationRepository, ObligationRoutes, TenantDirectory,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_compliance_routes<R, D, G, S>(
    obligations: ObligationRoutes<R, D>,
    insights: InsightRoutes<R, D, G>,
    digest: Arc<DeadlineDigestService<R, D, S>>,
) -> axum::Router
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
    G: InsightGateway + 'static,
    S: DigestSender + 'static,
{
    obligation_router(obligations)
        .merge(insight_router(insights))
        .merge(
            axum::Router::new()
                .route(
                    "/api/v1/notifications/deadline-digest",
                    axum::routing::post(digest_endpoint::<R, D, S>),
                )
                .with_state(digest),
        )
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DigestQuery {
    /// Reporting date override; defaults to the local calendar date.
    pub(crate) today: Option<NaiveDate>,
}

/// Cron-triggered entry point; there is no internal scheduler.
pub(crate) async fn digest_endpoint<R, D, S>(
    State(digest): State<Arc<DeadlineDigestService<R, D, S>>>,
    Query(query): Query<DigestQuery>,
) -> (StatusCode, Json<serde_json::Value>)
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
    S: DigestSender + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    match digest.run(today) {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        ),
    }
}
