use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rescatando_auth::AuthError;
use rescatando_database::DatabaseError;
use rescatando_shelter::ShelterError;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        error!(error = ?error, "internal error");
        Self::internal_server_error(error.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(what) => Self::not_found(format!("{what} not found")),
            DatabaseError::Duplicate(what) => Self::conflict(format!("{what} already exists")),
            DatabaseError::Conflict(message) => Self::conflict(message),
            other => {
                error!(error = ?other, "database error");
                Self::internal_server_error("internal database error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let status = match error {
            AuthError::InvalidCredentials
            | AuthError::SessionNotFound
            | AuthError::SessionExpired
            | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_)
            | AuthError::InvalidResetToken
            | AuthError::ResetTokenExpired => StatusCode::BAD_REQUEST,
            AuthError::UserExists(_) => StatusCode::CONFLICT,
            AuthError::UnknownEmail | AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Database(db) => return db.into(),
            AuthError::Sqlx(_) | AuthError::PasswordHash(_) => {
                error!(error = ?error, "auth error");
                return Self::internal_server_error("internal authentication error");
            }
        };
        warn!(%status, error = %error, "auth request refused");
        Self::new(status, error.to_string())
    }
}

impl From<ShelterError> for ApiError {
    fn from(error: ShelterError) -> Self {
        let status = match &error {
            ShelterError::NotFound(_) => StatusCode::NOT_FOUND,
            ShelterError::Validation(_) => StatusCode::BAD_REQUEST,
            ShelterError::InvalidTransition(_) | ShelterError::Conflict(_) => StatusCode::CONFLICT,
            ShelterError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShelterError::Database(_) | ShelterError::Sqlx(_) => {
                error!(error = ?error, "shelter database error");
                return Self::internal_server_error("internal database error");
            }
            ShelterError::Document(_) => {
                error!(error = ?error, "contract document error");
                return Self::internal_server_error("contract document could not be produced");
            }
        };
        Self::new(status, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescatando_auth::ValidationError;
    use rescatando_database::RequestStatus;
    use rescatando_shelter::{DocumentError, RequestAction, Workflow};

    #[test]
    fn shelter_errors_map_to_semantic_statuses() {
        let transition = RequestStatus::Approved
            .apply(RequestAction::Approve)
            .unwrap_err();

        let cases = [
            (ShelterError::not_found("animal 7"), StatusCode::NOT_FOUND),
            (ShelterError::InvalidTransition(transition), StatusCode::CONFLICT),
            (ShelterError::conflict("animal already adopted"), StatusCode::CONFLICT),
            (ShelterError::Forbidden("not yours".into()), StatusCode::FORBIDDEN),
            (ShelterError::validation("bad"), StatusCode::BAD_REQUEST),
        ];

        for (error, expected) in cases {
            let api_error: ApiError = error.into();
            assert_eq!(api_error.status, expected, "{}", api_error.message);
        }
    }

    #[test]
    fn auth_errors_map_to_semantic_statuses() {
        let cases = [
            (AuthError::SessionExpired, StatusCode::UNAUTHORIZED),
            (AuthError::UserExists("email"), StatusCode::CONFLICT),
            (AuthError::UnknownEmail, StatusCode::NOT_FOUND),
            (AuthError::ResetTokenExpired, StatusCode::BAD_REQUEST),
            (
                AuthError::Validation(ValidationError::new("password is too short")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Sqlx(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let api_error: ApiError = error.into();
            assert_eq!(api_error.status, expected, "{}", api_error.message);
        }
    }

    #[test]
    fn database_internals_are_not_leaked() {
        let api_error: ApiError = DatabaseError::QueryError("near \"SELEC\": syntax error".into()).into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "internal database error");
    }

    #[test]
    fn shelter_storage_failures_hide_their_details() {
        let cases = [
            ShelterError::Database(DatabaseError::QueryError("no such column: r.stauts".into())),
            ShelterError::Sqlx(sqlx::Error::Protocol("unexpected packet".into())),
        ];

        for error in cases {
            let api_error: ApiError = error.into();
            assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api_error.message, "internal database error");
        }

        let api_error: ApiError = ShelterError::Document(DocumentError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/srv/rescatando/media/contracts",
        )))
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api_error.message.contains("/srv"), "{}", api_error.message);
    }

    #[test]
    fn stale_status_writes_are_conflicts() {
        let api_error: ApiError =
            DatabaseError::Conflict("adoption request 3 is no longer pending".into()).into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.message, "adoption request 3 is no longer pending");
    }
}
