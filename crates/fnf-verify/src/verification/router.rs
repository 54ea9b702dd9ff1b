use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::AppEnvironment;

use super::domain::{EmployeeId, EmployeeRecord, VerificationId, VerifierId};
use super::repository::{
    EmployeeDirectory, PageRequest, Pagination, RepositoryError, VerificationHistoryEntry,
    VerificationRepository,
};
use super::request::{FieldError, VerificationRequest};
use super::service::{VerificationService, VerificationServiceError};

/// Header carrying the verifier identity resolved by the upstream gateway.
pub const VERIFIER_HEADER: &str = "x-verifier-id";
/// Header carrying the admin identity resolved by the upstream gateway.
pub const ADMIN_HEADER: &str = "x-admin-id";

const VERIFY_FAILED: &str = "Verification failed. Please try again.";
const FETCH_FAILED: &str = "Failed to fetch verification data";
const ADMIN_FAILED: &str = "Employee request failed. Please try again.";

pub struct VerificationState<E, R> {
    service: Arc<VerificationService<E, R>>,
    expose_internal_errors: bool,
}

impl<E, R> Clone for VerificationState<E, R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            expose_internal_errors: self.expose_internal_errors,
        }
    }
}

impl<E, R> VerificationState<E, R> {
    pub fn new(service: Arc<VerificationService<E, R>>, environment: AppEnvironment) -> Self {
        Self {
            service,
            expose_internal_errors: environment == AppEnvironment::Development,
        }
    }
}

/// Router builder exposing verifier and admin endpoints.
pub fn verification_router<E, R>(
    service: Arc<VerificationService<E, R>>,
    environment: AppEnvironment,
) -> Router
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/verify/request",
            post(submit_handler::<E, R>).get(lookup_handler::<E, R>),
        )
        .route(
            "/api/v1/admin/employees",
            post(create_employee_handler::<E, R>).get(list_employees_handler::<E, R>),
        )
        .route(
            "/api/v1/admin/employees/:employee_id",
            get(employee_handler::<E, R>),
        )
        .with_state(VerificationState::new(service, environment))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VerificationQuery {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<String>,
    #[serde(default)]
    pub(crate) limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    data: T,
}

#[derive(Debug, Serialize)]
struct Failure {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct HistoryView {
    verification_records: Vec<VerificationHistoryEntry>,
    pagination: Pagination,
}

pub(crate) async fn submit_handler<E, R>(
    State(state): State<VerificationState<E, R>>,
    headers: HeaderMap,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Response
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    let Some(verifier) = caller(&headers, VERIFIER_HEADER).map(VerifierId) else {
        return unauthorized();
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(&rejection),
    };

    match state.service.verify(&verifier, request, Utc::now()) {
        Ok(report) => success(
            StatusCode::OK,
            Some("Verification completed successfully"),
            report,
        ),
        Err(err) => service_failure(err, VERIFY_FAILED, state.expose_internal_errors),
    }
}

pub(crate) async fn lookup_handler<E, R>(
    State(state): State<VerificationState<E, R>>,
    headers: HeaderMap,
    Query(query): Query<VerificationQuery>,
) -> Response
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    let Some(verifier) = caller(&headers, VERIFIER_HEADER).map(VerifierId) else {
        return unauthorized();
    };

    if let Some(id) = query.id.filter(|id| !id.trim().is_empty()) {
        let id = VerificationId(id.trim().to_string());
        return match state.service.details(&verifier, &id, Utc::now()) {
            Ok(details) => success(StatusCode::OK, None, details),
            Err(err) => service_failure(err, FETCH_FAILED, state.expose_internal_errors),
        };
    }

    let page = PageRequest::new(parse_number(query.page), parse_number(query.limit));
    match state.service.history(&verifier, page) {
        Ok(page) => success(
            StatusCode::OK,
            None,
            HistoryView {
                verification_records: page.records,
                pagination: page.pagination,
            },
        ),
        Err(err) => service_failure(err, FETCH_FAILED, state.expose_internal_errors),
    }
}

pub(crate) async fn create_employee_handler<E, R>(
    State(state): State<VerificationState<E, R>>,
    headers: HeaderMap,
    payload: Result<Json<EmployeeRecord>, JsonRejection>,
) -> Response
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    if caller(&headers, ADMIN_HEADER).is_none() {
        return unauthorized();
    }
    let Json(record) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(&rejection),
    };

    match state.service.register_employee(record) {
        Ok(stored) => success(
            StatusCode::CREATED,
            Some("Employee record created successfully"),
            stored,
        ),
        Err(err) => service_failure(err, ADMIN_FAILED, state.expose_internal_errors),
    }
}

pub(crate) async fn list_employees_handler<E, R>(
    State(state): State<VerificationState<E, R>>,
    headers: HeaderMap,
) -> Response
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    if caller(&headers, ADMIN_HEADER).is_none() {
        return unauthorized();
    }

    match state.service.employees(Utc::now()) {
        Ok(employees) => success(StatusCode::OK, None, employees),
        Err(err) => service_failure(err, ADMIN_FAILED, state.expose_internal_errors),
    }
}

pub(crate) async fn employee_handler<E, R>(
    State(state): State<VerificationState<E, R>>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
) -> Response
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    if caller(&headers, ADMIN_HEADER).is_none() {
        return unauthorized();
    }

    let employee_id = EmployeeId::new(employee_id);
    match state.service.employee(&employee_id, Utc::now()) {
        Ok(view) => success(StatusCode::OK, None, view),
        Err(err) => service_failure(err, ADMIN_FAILED, state.expose_internal_errors),
    }
}

fn caller(headers: &HeaderMap, header: &str) -> Option<String> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_number(raw: Option<String>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse().ok())
}

fn success<T: Serialize>(status: StatusCode, message: Option<&'static str>, data: T) -> Response {
    let body = Envelope {
        success: true,
        message,
        data,
    };
    (status, Json(body)).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Failure {
        success: false,
        message: message.into(),
        errors: None,
        error: None,
    };
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    failure(StatusCode::UNAUTHORIZED, "Access token is required")
}

fn malformed_body(rejection: &JsonRejection) -> Response {
    let body = Failure {
        success: false,
        message: "Validation failed".to_string(),
        errors: Some(vec![FieldError::new("body", rejection.body_text())]),
        error: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn service_failure(err: VerificationServiceError, fallback: &str, expose: bool) -> Response {
    match err {
        VerificationServiceError::Validation(validation) => {
            let body = Failure {
                success: false,
                message: "Validation failed".to_string(),
                errors: Some(validation.errors().to_vec()),
                error: None,
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        VerificationServiceError::EmployeeNotFound(_)
        | VerificationServiceError::VerificationNotFound
        | VerificationServiceError::EmployeeRecordMissing => {
            failure(StatusCode::NOT_FOUND, err.to_string())
        }
        VerificationServiceError::Repository(RepositoryError::Conflict) => failure(
            StatusCode::CONFLICT,
            "A record with this identifier already exists",
        ),
        other => {
            error!(error = %other, "verification request failed");
            let body = Failure {
                success: false,
                message: fallback.to_string(),
                errors: None,
                error: expose.then(|| other.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
