use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use rescatando_auth::ProfileChanges;
use rescatando_database::{Contract, User};
use rescatando_shelter::MyAdoptions;

use crate::{ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Signed-in user", body = User),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.signed_in(&headers).await?))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "Profile",
    security(("bearerAuth" = [])),
    request_body = ProfileChanges,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid profile", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<User>, ApiError> {
    let user = state.signed_in(&headers).await?;
    let updated = state.authenticator().update_profile(&user, &changes).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/profile/adoptions",
    tag = "Profile",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller's requests, adoptions and contracts", body = MyAdoptions),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_adoptions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MyAdoptions>, ApiError> {
    let user = state.signed_in(&headers).await?;
    Ok(Json(state.shelter().adoptions.my_adoptions(&user).await?))
}

#[utoipa::path(
    post,
    path = "/api/profile/contracts/{id}/sign",
    tag = "Profile",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract signed by the adopter", body = Contract),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Contract belongs to another adopter", body = crate::error::ErrorResponse),
        (status = 404, description = "Contract not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_contract(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Contract>, ApiError> {
    let user = state.signed_in(&headers).await?;
    let contract = state.shelter().adoptions.sign_as_adopter(&user, id).await?;
    Ok(Json(contract))
}
