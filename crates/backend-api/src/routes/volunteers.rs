use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::NaiveDateTime;
use rescatando_database::{NewVolunteerApplication, VolunteerApplication};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    routes::{ActionResponse, ApplicationPayload},
    ApiError, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationInterviewRequest {
    #[schema(value_type = String, example = "2025-03-14T16:30:00")]
    pub interview_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApplicationDecisionRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/volunteer-applications",
    tag = "Volunteer Applications",
    request_body = NewVolunteerApplication,
    responses(
        (status = 201, description = "Application received", body = VolunteerApplication),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<NewVolunteerApplication>,
) -> Result<(StatusCode, Json<VolunteerApplication>), ApiError> {
    let applicant = state.maybe_signed_in(&headers).await?;
    let application = state
        .shelter()
        .volunteers
        .submit(&form, applicant.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/staff/volunteer-applications",
    tag = "Volunteer Applications",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Applications, newest first", body = [VolunteerApplication]),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<VolunteerApplication>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().volunteers.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/staff/volunteer-applications/{id}",
    tag = "Volunteer Applications",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application", body = VolunteerApplication),
        (status = 404, description = "Application not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<VolunteerApplication>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().volunteers.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/staff/volunteer-applications/{id}/schedule-interview",
    tag = "Volunteer Applications",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Application id")),
    request_body = ApplicationInterviewRequest,
    responses(
        (status = 200, description = "Interview scheduled, applicant notified", body = ApplicationPayload),
        (status = 409, description = "Application is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<ApplicationInterviewRequest>,
) -> Result<Json<ActionResponse<ApplicationPayload>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let outcome = state
        .shelter()
        .volunteers
        .schedule_interview(id, &staff, payload.interview_at)
        .await?;
    Ok(Json(ActionResponse::from_outcome(
        "Interview scheduled",
        outcome,
        |application| ApplicationPayload { application },
    )))
}

#[utoipa::path(
    post,
    path = "/api/staff/volunteer-applications/{id}/approve",
    tag = "Volunteer Applications",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Application id")),
    request_body = ApplicationDecisionRequest,
    responses(
        (status = 200, description = "Application approved, applicant notified", body = ApplicationPayload),
        (status = 409, description = "Application already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    payload: Option<Json<ApplicationDecisionRequest>>,
) -> Result<Json<ActionResponse<ApplicationPayload>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let Json(payload) = payload.unwrap_or_default();
    let outcome = state
        .shelter()
        .volunteers
        .approve(id, &staff, payload.notes.as_deref())
        .await?;
    Ok(Json(ActionResponse::from_outcome(
        "Volunteer application approved",
        outcome,
        |application| ApplicationPayload { application },
    )))
}

#[utoipa::path(
    post,
    path = "/api/staff/volunteer-applications/{id}/reject",
    tag = "Volunteer Applications",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Application id")),
    request_body = ApplicationDecisionRequest,
    responses(
        (status = 200, description = "Application rejected, applicant notified", body = ApplicationPayload),
        (status = 409, description = "Application already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    payload: Option<Json<ApplicationDecisionRequest>>,
) -> Result<Json<ActionResponse<ApplicationPayload>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let Json(payload) = payload.unwrap_or_default();
    let outcome = state
        .shelter()
        .volunteers
        .reject(id, &staff, payload.notes.as_deref())
        .await?;
    Ok(Json(ActionResponse::from_outcome(
        "Volunteer application rejected",
        outcome,
        |application| ApplicationPayload { application },
    )))
}
