//! Interview records kept for adoption requests and volunteer applications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

stored_enum! {
    /// What kind of application an interview belongs to.
    InterviewSubject, "interview subject" {
        AdoptionRequest => "adoption_request",
        VolunteerApplication => "volunteer_application",
    }
}

stored_enum! {
    /// `pending` until the application it belongs to is decided.
    InterviewResult, "interview result" {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InterviewRecord {
    pub id: i64,
    pub subject: InterviewSubject,
    pub subject_id: i64,
    /// Adopter or applicant name.
    pub interviewee: String,
    pub held_on: NaiveDate,
    pub observations: String,
    pub result: InterviewResult,
    pub interviewer_id: Option<i64>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterviewRecord {
    pub subject: InterviewSubject,
    pub subject_id: i64,
    pub held_on: NaiveDate,
    pub observations: String,
    pub result: InterviewResult,
    pub interviewer_id: Option<i64>,
}
