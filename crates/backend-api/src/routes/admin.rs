use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use rescatando_database::{Contract, User, UserRole};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{routes::MessageResponse, ApiError, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Users ordered by name", body = [User]),
        (status = 403, description = "Administrators only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    state.admin(&headers).await?;
    Ok(Json(state.shelter().users.list().await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{public_id}/role",
    tag = "Admin",
    security(("bearerAuth" = [])),
    params(("public_id" = String, Path, description = "User public identifier")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_role(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ChangeRoleRequest>,
) -> Result<Json<User>, ApiError> {
    let admin = state.admin(&headers).await?;
    let user = state
        .shelter()
        .users
        .change_role(&public_id, payload.role)
        .await?;
    info!(admin = %admin.public_id, user = %user.public_id, role = %user.role, "changed user role");
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{public_id}",
    tag = "Admin",
    security(("bearerAuth" = [])),
    params(("public_id" = String, Path, description = "User public identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 409, description = "User still has volunteer, adopter or donation records", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admin(&headers).await?;
    state.shelter().users.delete(&public_id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

#[utoipa::path(
    post,
    path = "/api/admin/contracts/{id}/sign",
    tag = "Admin",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract signed by the shelter", body = Contract),
        (status = 404, description = "Contract not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_contract(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Contract>, ApiError> {
    state.admin(&headers).await?;
    Ok(Json(state.shelter().adoptions.sign_as_admin(id).await?))
}
