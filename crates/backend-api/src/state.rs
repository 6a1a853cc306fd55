use axum::http::HeaderMap;
use rescatando_auth::{AuthSession, Authenticator};
use rescatando_database::{User, UserRole};
use rescatando_shelter::ShelterServices;

use crate::util::{optional_bearer, require_bearer};
use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    authenticator: Authenticator,
    shelter: ShelterServices,
}

impl AppState {
    pub fn new(authenticator: Authenticator, shelter: ShelterServices) -> Self {
        Self {
            authenticator,
            shelter,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn shelter(&self) -> &ShelterServices {
        &self.shelter
    }

    pub async fn authenticate(&self, token: &str) -> Result<(User, AuthSession), ApiError> {
        self.authenticator
            .authenticate_token(token)
            .await
            .map_err(ApiError::from)
    }

    /// Any signed-in user.
    pub async fn signed_in(&self, headers: &HeaderMap) -> Result<User, ApiError> {
        let token = require_bearer(headers)?;
        let (user, _) = self.authenticate(&token).await?;
        Ok(user)
    }

    /// The caller when a bearer token is present. A present but invalid token
    /// is still refused.
    pub async fn maybe_signed_in(&self, headers: &HeaderMap) -> Result<Option<User>, ApiError> {
        match optional_bearer(headers)? {
            Some(token) => Ok(Some(self.authenticate(&token).await?.0)),
            None => Ok(None),
        }
    }

    /// Admins and volunteers.
    pub async fn staff(&self, headers: &HeaderMap) -> Result<User, ApiError> {
        let user = self.signed_in(headers).await?;
        if !user.role.is_staff() {
            return Err(ApiError::forbidden("staff access required"));
        }
        Ok(user)
    }

    pub async fn admin(&self, headers: &HeaderMap) -> Result<User, ApiError> {
        let user = self.signed_in(headers).await?;
        if user.role != UserRole::Admin {
            return Err(ApiError::forbidden("administrator access required"));
        }
        Ok(user)
    }
}
