//! Adopters, adoption requests, adoptions and contracts

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

stored_enum! {
    /// Lifecycle of an adoption request.
    RequestStatus, "request status" {
        Pending => "pending",
        InterviewScheduled => "interview_scheduled",
        InterviewDone => "interview_done",
        Approved => "approved",
        Rejected => "rejected",
    }
}

stored_enum! {
    /// Lifecycle of an approved adoption.
    AdoptionStatus, "adoption status" {
        InProgress => "in_progress",
        ContractGenerated => "contract_generated",
        Completed => "completed",
    }
}

stored_enum! {
    SignatoryParty, "signatory" {
        Adopter => "adopter",
        Admin => "admin",
    }
}

/// Eligibility questionnaire filled in with every adoption request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AdopterProfile {
    pub name: String,
    pub phone: String,
    pub national_id: String,
    pub id_front_image: Option<String>,
    pub id_back_image: Option<String>,
    pub is_foreign: bool,
    pub has_permanent_residency: bool,
    pub address: String,
    pub city: String,
    pub district: String,
    pub age: i64,
    pub adoption_reason: String,
    pub has_had_pets: bool,
    pub current_pets_sterilized: String,
    pub current_pets_vaccinated: String,
    pub pet_food: String,
    pub household_size: i64,
    pub household_agrees: bool,
    pub household_allergies: bool,
    pub allergy_plan: String,
    pub housing_type: String,
    pub has_safety_netting: bool,
    pub pets_allowed: bool,
    pub has_financial_means: bool,
    pub relocation_plan: String,
    pub accepts_video_call: bool,
    pub accepts_follow_up: bool,
    pub accepts_photo_updates: bool,
    pub keeps_pet_indoors: bool,
}

impl Default for AdopterProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            national_id: String::new(),
            id_front_image: None,
            id_back_image: None,
            is_foreign: false,
            has_permanent_residency: false,
            address: String::new(),
            city: String::new(),
            district: String::new(),
            age: 18,
            adoption_reason: String::new(),
            has_had_pets: false,
            current_pets_sterilized: String::new(),
            current_pets_vaccinated: String::new(),
            pet_food: String::new(),
            household_size: 1,
            household_agrees: false,
            household_allergies: false,
            allergy_plan: String::new(),
            housing_type: String::new(),
            has_safety_netting: false,
            pets_allowed: false,
            has_financial_means: false,
            relocation_plan: String::new(),
            accepts_video_call: false,
            accepts_follow_up: false,
            accepts_photo_updates: false,
            keeps_pet_indoors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Adopter {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: String,
    #[serde(flatten)]
    pub profile: AdopterProfile,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdoptionRequest {
    pub id: i64,
    pub animal_id: i64,
    pub adopter_id: i64,
    pub status: RequestStatus,
    pub submitted_on: NaiveDate,
    pub interview_at: Option<NaiveDateTime>,
    pub meeting_link: Option<String>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_on: Option<NaiveDate>,
    pub processed_by: Option<i64>,
}

/// Request joined with the names staff screens and emails need.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdoptionRequestSummary {
    #[serde(flatten)]
    pub request: AdoptionRequest,
    pub animal_name: String,
    pub adopter_name: String,
    pub adopter_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Adoption {
    pub id: i64,
    pub animal_id: i64,
    pub adopter_id: i64,
    /// Cleared when the originating request is deleted.
    pub request_id: Option<i64>,
    pub status: AdoptionStatus,
    pub adopted_on: NaiveDate,
    pub contract_on: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    pub approved_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdoptionSummary {
    #[serde(flatten)]
    pub adoption: Adoption,
    pub animal_name: String,
    pub adopter_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Contract {
    pub id: i64,
    pub adoption_id: i64,
    pub adopter_id: i64,
    pub generated_on: NaiveDate,
    /// Set once the document has been rendered to storage.
    pub document_path: Option<String>,
    pub adopter_signed: bool,
    pub adopter_signed_on: Option<NaiveDate>,
    pub admin_signed: bool,
    pub admin_signed_on: Option<NaiveDate>,
    pub accepts_follow_up: bool,
    pub care_commitment: String,
}

impl Contract {
    pub fn is_fully_signed(&self) -> bool {
        self.adopter_signed && self.admin_signed
    }
}
