//! Error types for shelter operations.

use rescatando_auth::ValidationError;
use rescatando_database::DatabaseError;
use thiserror::Error;

use crate::contracts::DocumentError;
use crate::workflow::TransitionError;

pub type ShelterResult<T> = Result<T, ShelterError>;

#[derive(Debug, Error)]
pub enum ShelterError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("contract document error: {0}")]
    Document(#[from] DocumentError),

    #[error("database error: {0}")]
    Database(DatabaseError),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl ShelterError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(message))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<DatabaseError> for ShelterError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            DatabaseError::Duplicate(message) | DatabaseError::Conflict(message) => {
                Self::Conflict(message)
            }
            other => Self::Database(other),
        }
    }
}
