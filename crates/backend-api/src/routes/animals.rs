use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rescatando_database::{AdopterProfile, AdoptionRequest, AnimalWithRecord};

use crate::{ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/animals",
    tag = "Animals",
    responses((status = 200, description = "Animals available for adoption", body = [AnimalWithRecord]))
)]
pub async fn list_available(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimalWithRecord>>, ApiError> {
    Ok(Json(state.shelter().animals.list_available().await?))
}

#[utoipa::path(
    get,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(("id" = i64, Path, description = "Animal id")),
    responses(
        (status = 200, description = "Animal with its medical record", body = AnimalWithRecord),
        (status = 404, description = "Animal not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AnimalWithRecord>, ApiError> {
    Ok(Json(state.shelter().animals.get_with_record(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/animals/{id}/adoption-requests",
    tag = "Animals",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Animal id")),
    request_body = AdopterProfile,
    responses(
        (status = 201, description = "Adoption request submitted", body = AdoptionRequest),
        (status = 400, description = "Incomplete questionnaire", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Animal not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Animal already adopted", body = crate::error::ErrorResponse)
    )
)]
pub async fn request_adoption(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(profile): Json<AdopterProfile>,
) -> Result<(StatusCode, Json<AdoptionRequest>), ApiError> {
    let user = state.signed_in(&headers).await?;
    let request = state
        .shelter()
        .adoptions
        .submit_request(&user, id, &profile)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}
