pub mod admin;
pub mod adoptions;
pub mod animals;
pub mod auth;
pub mod donations;
pub mod health;
pub mod profile;
pub mod staff;
pub mod volunteers;

use rescatando_database::{
    Adoption, AdoptionRequestSummary, Contract, VolunteerApplication,
};
use rescatando_shelter::ActionOutcome;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every state-changing workflow action: a human readable message,
/// follow-up failures that did not undo the change, and the payload fields.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub message: String,
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> ActionResponse<T> {
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            warnings: Vec::new(),
            payload,
        }
    }

    pub fn from_outcome<V>(
        message: impl Into<String>,
        outcome: ActionOutcome<V>,
        payload: impl FnOnce(V) -> T,
    ) -> Self {
        Self {
            message: message.into(),
            warnings: outcome.warnings,
            payload: payload(outcome.value),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestPayload {
    pub request: AdoptionRequestSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdoptionPayload {
    pub adoption: Adoption,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContractPayload {
    pub adoption: Adoption,
    pub contract: Contract,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationPayload {
    pub application: VolunteerApplication,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestDeletedPayload {
    /// Whether the animal went back on the adoption list.
    pub animal_available: bool,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct NoPayload {}
