use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::repository::{
    AdmissionsRepository, MeritListFilter, NotificationSink, RepositoryError,
};
use super::service::{AdmissionsError, AdmissionsService, ApplicationForm, SettlementRequest};

/// Router builder exposing HTTP endpoints for intake and settlement.
pub fn admissions_router<R, N>(service: Arc<AdmissionsService<R, N>>) -> Router
where
    R: AdmissionsRepository + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/admissions/applications", post(submit_handler::<R, N>))
        .route(
            "/api/v1/admissions/merit/generate",
            post(generate_handler::<R, N>),
        )
        .route("/api/v1/admissions/merit", get(merit_list_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    axum::Json(form): axum::Json<ApplicationForm>,
) -> Response
where
    R: AdmissionsRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.submit(form) {
        Ok(application) => {
            let payload = json!({
                "message": "Application submitted successfully",
                "application": application,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(AdmissionsError::CourseNotFound) => {
            let payload = json!({
                "error": "course not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(AdmissionsError::Intake(violation)) => {
            let payload = json!({
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AdmissionsError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "application already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn generate_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    axum::Json(request): axum::Json<SettlementRequest>,
) -> Response
where
    R: AdmissionsRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.generate_merit_list(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(AdmissionsError::CourseNotFound) => {
            let payload = json!({
                "error": "course not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(AdmissionsError::NoEligibleCandidates) => {
            let payload = json!({
                "error": "no eligible applications found",
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn merit_list_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Query(filter): Query<MeritListFilter>,
) -> Response
where
    R: AdmissionsRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.merit_list(filter) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
