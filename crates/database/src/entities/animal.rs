//! Animals, their medical records and the foster homes that house them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Volunteer {
    pub id: i64,
    pub user_id: i64,
    pub volunteer_type: String,
    pub joined_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FosterHome {
    pub id: i64,
    pub volunteer_id: i64,
    pub address: String,
    pub description: String,
    pub capacity: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewFosterHome {
    pub volunteer_id: i64,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub capacity: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub age: i64,
    pub sex: String,
    pub health_status: String,
    pub description: String,
    pub photo: Option<String>,
    /// Derived from the adoption workflow, never edited directly.
    pub available: bool,
    pub foster_home_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Editable animal fields. `foster_home_id` is optional on create, where a
/// default home is chosen when it is absent.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnimalInput {
    pub name: String,
    pub species: String,
    pub age: i64,
    pub sex: String,
    pub health_status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub foster_home_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MedicalRecord {
    pub id: i64,
    pub animal_id: i64,
    pub sterilized: bool,
    pub sterilized_on: Option<NaiveDate>,
    pub vaccines_up_to_date: bool,
    pub last_vaccination: Option<String>,
    pub last_checkup: Option<NaiveDate>,
    pub next_checkup: Option<NaiveDate>,
    pub health_status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(default)]
pub struct MedicalRecordInput {
    pub sterilized: bool,
    pub sterilized_on: Option<NaiveDate>,
    pub vaccines_up_to_date: bool,
    pub last_vaccination: Option<String>,
    pub last_checkup: Option<NaiveDate>,
    pub next_checkup: Option<NaiveDate>,
    pub health_status: String,
    pub notes: Option<String>,
}

impl Default for MedicalRecordInput {
    fn default() -> Self {
        Self {
            sterilized: false,
            sterilized_on: None,
            vaccines_up_to_date: true,
            last_vaccination: None,
            last_checkup: None,
            next_checkup: None,
            health_status: "Good".to_string(),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnimalWithRecord {
    #[serde(flatten)]
    pub animal: Animal,
    pub medical_record: Option<MedicalRecord>,
}
