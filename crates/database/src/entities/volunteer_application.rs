//! Volunteer application entity definitions

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

stored_enum! {
    /// Team an applicant wants to join.
    VolunteerTeam, "volunteer team" {
        Veterinary => "veterinary",
        Grooming => "grooming",
        Rescue => "rescue",
        Design => "design",
        Workshop => "workshop",
        FosterHome => "foster_home",
    }
}

stored_enum! {
    ApplicationStatus, "application status" {
        Pending => "pending",
        InterviewScheduled => "interview_scheduled",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VolunteerApplication {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub instagram: Option<String>,
    pub team: VolunteerTeam,
    pub experience: String,
    pub motivation: String,
    pub additional_info: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub interview_at: Option<NaiveDateTime>,
    pub admin_notes: Option<String>,
    pub applicant_user_id: Option<i64>,
    pub processed_by: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewVolunteerApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub instagram: Option<String>,
    pub team: VolunteerTeam,
    #[serde(default)]
    pub experience: String,
    pub motivation: String,
    #[serde(default)]
    pub additional_info: Option<String>,
}
