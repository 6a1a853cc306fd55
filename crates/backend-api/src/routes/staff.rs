//! Staff back office: animals, medical records, foster homes, volunteers,
//! interview records and the dashboard.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rescatando_database::{
    Animal, AnimalInput, AnimalWithRecord, FosterHome, InterviewRecord, MedicalRecord,
    MedicalRecordInput, NewFosterHome, Volunteer,
};
use rescatando_shelter::Dashboard;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{routes::MessageResponse, ApiError, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAnimalRequest {
    pub animal: AnimalInput,
    /// Defaults to a healthy, vaccinated, unsterilized record.
    #[serde(default)]
    pub medical_record: Option<MedicalRecordInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVolunteerRequest {
    /// Public id of the user joining the volunteer roster.
    pub user_id: String,
    pub volunteer_type: String,
}

#[utoipa::path(
    get,
    path = "/api/staff/animals",
    tag = "Staff",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All animals ordered by name", body = [Animal]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_animals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Animal>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().animals.list_all().await?))
}

#[utoipa::path(
    post,
    path = "/api/staff/animals",
    tag = "Staff",
    security(("bearerAuth" = [])),
    request_body = CreateAnimalRequest,
    responses(
        (status = 201, description = "Animal and medical record created", body = AnimalWithRecord),
        (status = 400, description = "Invalid animal", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse),
        (status = 409, description = "No foster home can be assigned", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_animal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateAnimalRequest>,
) -> Result<(StatusCode, Json<AnimalWithRecord>), ApiError> {
    state.staff(&headers).await?;
    let record = payload.medical_record.unwrap_or_default();
    let created = state
        .shelter()
        .animals
        .create(&payload.animal, &record)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/staff/animals/{id}",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Animal id")),
    responses(
        (status = 200, description = "Animal with its medical record", body = AnimalWithRecord),
        (status = 404, description = "Animal not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<AnimalWithRecord>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().animals.get_with_record(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/staff/animals/{id}",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Animal id")),
    request_body = AnimalInput,
    responses(
        (status = 200, description = "Animal updated", body = Animal),
        (status = 400, description = "Invalid animal", body = crate::error::ErrorResponse),
        (status = 404, description = "Animal or foster home not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<AnimalInput>,
) -> Result<Json<Animal>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().animals.update(id, &input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/staff/animals/{id}",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Animal id")),
    responses(
        (status = 200, description = "Animal deleted", body = MessageResponse),
        (status = 404, description = "Animal not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.staff(&headers).await?;
    state.shelter().animals.delete(id).await?;
    Ok(Json(MessageResponse::new("Animal deleted")))
}

#[utoipa::path(
    get,
    path = "/api/staff/animals/{id}/medical-record",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Animal id")),
    responses(
        (status = 200, description = "Medical record", body = MedicalRecord),
        (status = 404, description = "No medical record for the animal", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_medical_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MedicalRecord>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().animals.medical_record(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/staff/animals/{id}/medical-record",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Animal id")),
    request_body = MedicalRecordInput,
    responses(
        (status = 200, description = "Medical record updated", body = MedicalRecord),
        (status = 404, description = "No medical record for the animal", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_medical_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<MedicalRecordInput>,
) -> Result<Json<MedicalRecord>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(
        state.shelter().animals.update_medical_record(id, &input).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/staff/foster-homes",
    tag = "Staff",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Foster homes", body = [FosterHome]))
)]
pub async fn list_foster_homes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FosterHome>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().animals.list_foster_homes().await?))
}

#[utoipa::path(
    post,
    path = "/api/staff/foster-homes",
    tag = "Staff",
    security(("bearerAuth" = [])),
    request_body = NewFosterHome,
    responses(
        (status = 201, description = "Foster home created", body = FosterHome),
        (status = 400, description = "Invalid foster home", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_foster_home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(home): Json<NewFosterHome>,
) -> Result<(StatusCode, Json<FosterHome>), ApiError> {
    state.staff(&headers).await?;
    let home = state.shelter().animals.create_foster_home(&home).await?;
    Ok((StatusCode::CREATED, Json(home)))
}

#[utoipa::path(
    get,
    path = "/api/staff/volunteers",
    tag = "Staff",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Volunteer roster", body = [Volunteer]))
)]
pub async fn list_volunteers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Volunteer>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().animals.list_volunteers().await?))
}

#[utoipa::path(
    post,
    path = "/api/staff/volunteers",
    tag = "Staff",
    security(("bearerAuth" = [])),
    request_body = CreateVolunteerRequest,
    responses(
        (status = 201, description = "Volunteer added", body = Volunteer),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_volunteer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateVolunteerRequest>,
) -> Result<(StatusCode, Json<Volunteer>), ApiError> {
    state.staff(&headers).await?;
    let volunteer = state
        .shelter()
        .animals
        .create_volunteer(&payload.user_id, &payload.volunteer_type)
        .await?;
    Ok((StatusCode::CREATED, Json(volunteer)))
}

#[utoipa::path(
    get,
    path = "/api/staff/dashboard",
    tag = "Staff",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Everything waiting for a decision", body = Dashboard),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Dashboard>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().dashboard.load().await?))
}

#[utoipa::path(
    get,
    path = "/api/staff/interviews",
    tag = "Staff",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Adoption and volunteer interviews, most recent first", body = [InterviewRecord]),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_interviews(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InterviewRecord>>, ApiError> {
    state.staff(&headers).await?;
    Ok(Json(state.shelter().dashboard.interviews().await?))
}
