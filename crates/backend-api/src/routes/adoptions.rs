//! Staff actions on adoption requests and adoptions.
//!
//! Every action answers with an [`ActionResponse`]: the committed change is
//! reported even when the email or the contract document failed afterwards.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDateTime;
use rescatando_database::{AdoptionRequestSummary, AdoptionSummary, Contract};
use rescatando_shelter::ApprovedAdoption;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    routes::{
        ActionResponse, AdoptionPayload, ContractPayload, NoPayload, RequestDeletedPayload,
        RequestPayload,
    },
    ApiError, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleInterviewRequest {
    #[schema(value_type = String, example = "2025-03-14T16:30:00")]
    pub interview_at: NaiveDateTime,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InterviewDoneRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdoptionDetail {
    #[serde(flatten)]
    pub summary: AdoptionSummary,
    pub contracts: Vec<Contract>,
}

#[utoipa::path(
    get,
    path = "/api/staff/adoption-requests",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All adoption requests", body = [AdoptionRequestSummary]),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdoptionRequestSummary>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().adoptions.list_requests().await?))
}

#[utoipa::path(
    get,
    path = "/api/staff/adoption-requests/{id}",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption request id")),
    responses(
        (status = 200, description = "Adoption request", body = AdoptionRequestSummary),
        (status = 404, description = "Adoption request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<AdoptionRequestSummary>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().adoptions.get_request(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/staff/adoption-requests/{id}/schedule-interview",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption request id")),
    request_body = ScheduleInterviewRequest,
    responses(
        (status = 200, description = "Interview scheduled, adopter notified", body = RequestPayload),
        (status = 404, description = "Adoption request not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Request is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<ScheduleInterviewRequest>,
) -> Result<Json<ActionResponse<RequestPayload>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let outcome = state
        .shelter()
        .adoptions
        .schedule_interview(id, &staff, payload.interview_at, payload.meeting_link.as_deref())
        .await?;
    Ok(Json(ActionResponse::from_outcome(
        "Interview scheduled",
        outcome,
        |request| RequestPayload { request },
    )))
}

#[utoipa::path(
    post,
    path = "/api/staff/adoption-requests/{id}/interview-done",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption request id")),
    request_body = InterviewDoneRequest,
    responses(
        (status = 200, description = "Interview closed and recorded", body = RequestPayload),
        (status = 409, description = "No interview was scheduled", body = crate::error::ErrorResponse)
    )
)]
pub async fn interview_done(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    payload: Option<Json<InterviewDoneRequest>>,
) -> Result<Json<ActionResponse<RequestPayload>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let Json(payload) = payload.unwrap_or_default();
    let request = state
        .shelter()
        .adoptions
        .mark_interview_done(id, &staff, payload.notes.as_deref())
        .await?;
    Ok(Json(ActionResponse::new(
        "Interview marked as done",
        RequestPayload { request },
    )))
}

#[utoipa::path(
    post,
    path = "/api/staff/adoption-requests/{id}/approve",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption request id")),
    responses(
        (status = 200, description = "Request approved, adoption and contract created", body = ApprovedAdoption),
        (status = 404, description = "Adoption request not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Request already decided or animal already adopted", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse<ApprovedAdoption>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let outcome = state.shelter().adoptions.approve(id, &staff).await?;
    Ok(Json(ActionResponse::from_outcome(
        "Adoption request approved",
        outcome,
        |approved| approved,
    )))
}

#[utoipa::path(
    post,
    path = "/api/staff/adoption-requests/{id}/reject",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption request id")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Request rejected, adopter notified", body = RequestPayload),
        (status = 409, description = "Request already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    payload: Option<Json<RejectRequest>>,
) -> Result<Json<ActionResponse<RequestPayload>>, ApiError> {
    let staff = state.staff(&headers).await?;
    let Json(payload) = payload.unwrap_or_default();
    let outcome = state
        .shelter()
        .adoptions
        .reject(id, &staff, payload.reason.as_deref())
        .await?;
    Ok(Json(ActionResponse::from_outcome(
        "Adoption request rejected",
        outcome,
        |request| RequestPayload { request },
    )))
}

#[utoipa::path(
    delete,
    path = "/api/staff/adoption-requests/{id}",
    tag = "Adoption Requests",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption request id")),
    responses(
        (status = 200, description = "Request deleted", body = RequestDeletedPayload),
        (status = 404, description = "Adoption request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse<RequestDeletedPayload>>, ApiError> {
    state.staff(&headers).await?;
    let restored = state.shelter().adoptions.delete_request(id).await?;
    Ok(Json(ActionResponse::new(
        "Adoption request deleted",
        RequestDeletedPayload {
            animal_available: restored,
        },
    )))
}

#[utoipa::path(
    get,
    path = "/api/staff/adoptions",
    tag = "Adoptions",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "All adoptions", body = [AdoptionSummary]))
)]
pub async fn list_adoptions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdoptionSummary>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().adoptions.list_adoptions().await?))
}

#[utoipa::path(
    get,
    path = "/api/staff/adoptions/{id}",
    tag = "Adoptions",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption id")),
    responses(
        (status = 200, description = "Adoption with its contracts", body = AdoptionDetail),
        (status = 404, description = "Adoption not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_adoption(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<AdoptionDetail>, ApiError> {
    state.staff(&headers).await?;
    let adoptions = &state.shelter().adoptions;
    let summary = adoptions.get_adoption(id).await?;
    let contracts = adoptions.contracts_for_adoption(id).await?;
    Ok(Json(AdoptionDetail { summary, contracts }))
}

#[utoipa::path(
    post,
    path = "/api/staff/adoptions/{id}/contract",
    tag = "Adoptions",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption id")),
    responses(
        (status = 200, description = "Contract document generated", body = ContractPayload),
        (status = 409, description = "Adoption is not in progress", body = crate::error::ErrorResponse),
        (status = 500, description = "Document could not be written", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_contract(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse<ContractPayload>>, ApiError> {
    state.staff(&headers).await?;
    let (adoption, contract) = state.shelter().adoptions.generate_contract(id).await?;
    Ok(Json(ActionResponse::new(
        "Contract generated",
        ContractPayload { adoption, contract },
    )))
}

#[utoipa::path(
    post,
    path = "/api/staff/adoptions/{id}/complete",
    tag = "Adoptions",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption id")),
    responses(
        (status = 200, description = "Adoption completed", body = AdoptionPayload),
        (status = 409, description = "Contract not generated yet", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse<AdoptionPayload>>, ApiError> {
    state.staff(&headers).await?;
    let adoption = state.shelter().adoptions.complete(id).await?;
    Ok(Json(ActionResponse::new(
        "Adoption completed",
        AdoptionPayload { adoption },
    )))
}

#[utoipa::path(
    delete,
    path = "/api/staff/adoptions/{id}",
    tag = "Adoptions",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Adoption id")),
    responses(
        (status = 200, description = "Adoption cancelled, animal available again", body = NoPayload),
        (status = 404, description = "Adoption not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_adoption(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse<NoPayload>>, ApiError> {
    state.staff(&headers).await?;
    let outcome = state.shelter().adoptions.delete_adoption(id).await?;
    Ok(Json(ActionResponse::from_outcome(
        "Adoption deleted, the animal is available again",
        outcome,
        |()| NoPayload::default(),
    )))
}
