use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rescatando_auth::{AuthSession, Registration};
use rescatando_database::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    routes::{ActionResponse, MessageResponse, NoPayload},
    util::require_bearer,
    ApiError, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub account: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
    pub expires_at: String,
}

impl SessionResponse {
    pub fn new(session: AuthSession, user: User) -> Self {
        Self {
            token: session.token,
            user,
            expires_at: session.expires_at.to_rfc3339(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = Registration,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid registration form", body = crate::error::ErrorResponse),
        (status = 409, description = "Account or email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<Registration>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.authenticator().register(&form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (user, session) = state
        .authenticator()
        .login(&payload.account, &payload.password)
        .await?;
    Ok(Json(SessionResponse::new(session, user)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Session closed", body = MessageResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    state.authenticator().logout(&token).await?;
    Ok(Json(MessageResponse::new("Signed out")))
}

#[utoipa::path(
    post,
    path = "/api/auth/password/forgot",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link emailed", body = MessageResponse),
        (status = 404, description = "No account uses that email", body = crate::error::ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ActionResponse<NoPayload>>, ApiError> {
    let outcome = state
        .shelter()
        .accounts
        .forgot_password(&payload.email)
        .await?;
    Ok(Json(ActionResponse::from_outcome(
        "A password reset link was sent to your email",
        outcome,
        |()| NoPayload::default(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/auth/password/reset/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Reset token from the emailed link")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired token, or invalid password", body = crate::error::ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .authenticator()
        .reset_password(&token, &payload.password, &payload.password_confirmation)
        .await?;
    Ok(Json(MessageResponse::new(
        "Your password was changed, you can sign in now",
    )))
}
