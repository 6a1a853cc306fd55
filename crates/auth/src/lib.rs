pub mod validation;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rescatando_config::AuthConfig;
use rescatando_database::{
    Avatar, DatabaseError, NewUser, PasswordResetRepository, PasswordResetToken, User,
    UserProfileUpdate, UserRepository, UserRole,
};
use serde::Deserialize;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;

pub use validation::ValidationError;
use validation::{
    required, sanitize_optional, validate_email, validate_new_password, ACCOUNT_MAX, ADDRESS_MAX,
    EMAIL_MAX, NAME_MAX, PHONE_MAX,
};

#[derive(Clone)]
pub struct Authenticator {
    pool: SqlitePool,
    users: UserRepository,
    resets: PasswordResetRepository,
    session_ttl: Duration,
    reset_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} is already registered")]
    UserExists(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("no account uses that email address")]
    UnknownEmail,
    #[error("user not found")]
    UserNotFound,
    #[error("password reset link is invalid")]
    InvalidResetToken,
    #[error("password reset link has expired")]
    ResetTokenExpired,
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("session not found")]
    SessionNotFound,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid session token")]
    InvalidSession,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Self-service sign-up form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Registration {
    pub name: String,
    pub account: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub avatar: Avatar,
}

/// Profile edit form; the password is only changed when `new_password` is set.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProfileChanges {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub avatar: Avatar,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        let session_ttl = Duration::seconds(config.session_ttl_seconds.min(i64::MAX as u64) as i64);
        let reset_ttl =
            Duration::seconds(config.password_reset_ttl_seconds.min(i64::MAX as u64) as i64);

        Self {
            users: UserRepository::new(pool.clone()),
            resets: PasswordResetRepository::new(pool.clone()),
            pool,
            session_ttl,
            reset_ttl,
        }
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Register a self-service account. New accounts always get the `user` role.
    pub async fn register(&self, form: &Registration) -> Result<User, AuthError> {
        let name = required("name", &form.name, NAME_MAX)?;
        let account = required("account", &form.account, ACCOUNT_MAX)?;
        let email = required("email", &form.email, EMAIL_MAX)?;
        validate_email(&email)?;
        validate_new_password(&form.password, &form.password_confirmation)?;

        if self.users.account_taken(&account).await? {
            return Err(AuthError::UserExists("account"));
        }
        if self.users.email_taken(&email, None).await? {
            return Err(AuthError::UserExists("email"));
        }

        let user = self
            .users
            .create(&NewUser {
                name,
                account,
                email,
                phone: sanitize_optional(form.phone.as_deref(), PHONE_MAX),
                address: sanitize_optional(form.address.as_deref(), ADDRESS_MAX),
                role: UserRole::User,
                avatar: form.avatar,
                password_hash: hash_password(&form.password)?,
            })
            .await
            .map_err(duplicate_as_exists)?;

        info!(user = %user.public_id, account = %user.account, "registered account");
        Ok(user)
    }

    /// Create an administrator unless the account already exists.
    pub async fn ensure_admin(
        &self,
        account: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        if self.users.account_taken(account).await? {
            debug!(account, "admin account already present");
            return Ok(None);
        }

        let user = self
            .users
            .create(&NewUser {
                name: name.to_string(),
                account: account.to_string(),
                email: email.to_string(),
                phone: None,
                address: None,
                role: UserRole::Admin,
                avatar: Avatar::default(),
                password_hash: hash_password(password)?,
            })
            .await
            .map_err(duplicate_as_exists)?;

        info!(user = %user.public_id, account, "created administrator");
        Ok(Some(user))
    }

    pub async fn login(&self, account: &str, password: &str) -> Result<(User, AuthSession), AuthError> {
        let Some((user_id, stored)) = self.users.credentials_for_account(account.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &stored)?;

        let user = self.fetch_user(user_id).await?;
        let session = self.issue_session(user_id).await?;
        info!(user = %user.public_id, "login succeeded");
        Ok((user, session))
    }

    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn authenticate_token(&self, token: &str) -> Result<(User, AuthSession), AuthError> {
        let row = sqlx::query("SELECT user_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AuthError::SessionNotFound);
        };

        let user_id: i64 = row.try_get("user_id")?;
        let expires_at: String = row.try_get("expires_at")?;

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|_| AuthError::InvalidSession)?
            .with_timezone(&Utc);

        if expires_at <= Utc::now() {
            sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(token)
                .execute(&self.pool)
                .await?;
            return Err(AuthError::SessionExpired);
        }

        let user = self.fetch_user(user_id).await?;
        let session = AuthSession {
            token: token.to_owned(),
            user_id,
            expires_at,
        };

        Ok((user, session))
    }

    pub async fn update_profile(&self, user: &User, changes: &ProfileChanges) -> Result<User, AuthError> {
        let name = required("name", &changes.name, NAME_MAX)?;
        let email = required("email", &changes.email, EMAIL_MAX)?;
        validate_email(&email)?;

        if self.users.email_taken(&email, Some(user.id)).await? {
            return Err(AuthError::UserExists("email"));
        }

        let new_hash = match changes.new_password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => {
                let confirmation = changes.password_confirmation.as_deref().unwrap_or_default();
                validate_new_password(password, confirmation)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let updated = self
            .users
            .update_profile(
                user.id,
                &UserProfileUpdate {
                    name,
                    email,
                    phone: sanitize_optional(changes.phone.as_deref(), PHONE_MAX),
                    address: sanitize_optional(changes.address.as_deref(), ADDRESS_MAX),
                    avatar: changes.avatar,
                },
            )
            .await
            .map_err(duplicate_as_exists)?;

        if let Some(hash) = new_hash {
            self.users.update_password_hash(user.id, &hash).await?;
            info!(user = %user.public_id, "password changed");
        }

        Ok(updated)
    }

    /// Issue a single-use reset token for the account owning `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<(User, PasswordResetToken), AuthError> {
        let email = email.trim();
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UnknownEmail)?;

        let token = self.resets.replace_for_user(user.id, &generate_token()).await?;
        info!(user = %user.public_id, "password reset requested");
        Ok((user, token))
    }

    /// Check a reset token without consuming it.
    pub async fn validate_reset_token(&self, token: &str) -> Result<PasswordResetToken, AuthError> {
        let record = self
            .resets
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        if !record.is_valid_at(Utc::now(), self.reset_ttl) {
            self.resets.delete(record.id).await?;
            return Err(AuthError::ResetTokenExpired);
        }

        Ok(record)
    }

    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<User, AuthError> {
        let record = self.validate_reset_token(token).await?;
        validate_new_password(password, confirmation)?;

        let hash = hash_password(password)?;
        self.users.update_password_hash(record.user_id, &hash).await?;
        self.resets.delete(record.id).await?;

        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(record.user_id)
            .execute(&self.pool)
            .await?;

        let user = self.fetch_user(record.user_id).await?;
        info!(user = %user.public_id, "password reset completed");
        Ok(user)
    }

    async fn fetch_user(&self, id: i64) -> Result<User, AuthError> {
        self.users.find_by_id(id).await?.ok_or(AuthError::UserNotFound)
    }

    async fn issue_session(&self, user_id: i64) -> Result<AuthSession, AuthError> {
        let token = generate_token();
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        sqlx::query(
            "INSERT INTO sessions (user_id, token, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&token)
        .bind(now.to_rfc3339())
        .bind(expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(AuthSession {
            token,
            user_id,
            expires_at,
        })
    }
}

fn duplicate_as_exists(error: DatabaseError) -> AuthError {
    match error {
        DatabaseError::Duplicate(message) if message.contains("account") => {
            AuthError::UserExists("account")
        }
        DatabaseError::Duplicate(message) if message.contains("email") => {
            AuthError::UserExists("email")
        }
        other => AuthError::Database(other),
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<(), AuthError> {
    let stored_hash = PasswordHash::new(stored)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &stored_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// 32 random bytes, URL-safe base64 without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
