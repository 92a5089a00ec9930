use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{Action, AuthUser};
use crate::db::enrollments;
use crate::error::AppError;
use crate::models::{
    DecisionRequest, EnrollmentRequest, EnrollmentRequestRow, NewEnrollmentRequest,
    RequestStatus, StatusResponse,
};
use crate::services::EnrollmentService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/enrollments/requests",
            get(list_requests).post(create_request),
        )
        .route("/enrollments/requests/{id}", put(decide_request))
        .route("/enrollments/status", get(enrollment_status))
}

#[derive(Deserialize)]
struct StatusParams {
    course_id: String,
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<String>,
}

async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentRequest>), AppError> {
    user.authorize(Action::Study)?;

    if req.course_id.trim().is_empty() {
        return Err(AppError::BadRequest("Course ID is required".to_string()));
    }

    let service = EnrollmentService::new(state.db.clone());
    let request = service.request_enrollment(&user.id, &req.course_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn enrollment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<StatusParams>,
) -> Result<Json<StatusResponse>, AppError> {
    let service = EnrollmentService::new(state.db.clone());
    let status = service.status(&user.id, &params.course_id).await?;
    Ok(Json(StatusResponse { status }))
}

async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<EnrollmentRequestRow>>, AppError> {
    user.authorize(Action::DecideEnrollments)?;

    // An unknown filter value just means no filter, like the source UI.
    let status = params.status.as_deref().and_then(parse_status);
    let requests = enrollments::fetch_requests(&state.db, status).await?;
    Ok(Json(requests))
}

async fn decide_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.authorize(Action::DecideEnrollments)?;

    let decision = match req.status.as_str() {
        "APPROVED" => RequestStatus::Approved,
        "REJECTED" => RequestStatus::Rejected,
        _ => return Err(AppError::BadRequest("Invalid status provided".to_string())),
    };

    let service = EnrollmentService::new(state.db.clone());
    let decided = service.decide(&id, decision).await?;
    Ok(Json(json!({
        "message": format!("Request successfully {}", decided.status.as_lower()),
    })))
}

fn parse_status(raw: &str) -> Option<RequestStatus> {
    match raw {
        "PENDING" => Some(RequestStatus::Pending),
        "APPROVED" => Some(RequestStatus::Approved),
        "REJECTED" => Some(RequestStatus::Rejected),
        _ => None,
    }
}
