use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use rescatando_auth::validation::{
    required, sanitize_input, sanitize_optional, validate_email, ADDRESS_MAX, EMAIL_MAX, NAME_MAX,
    PHONE_MAX, TEXT_MAX,
};
use rescatando_config::ShelterConfig;
use rescatando_database::{
    ApplicationStatus, InterviewRepository, InterviewResult, InterviewSubject, NewInterviewRecord,
    NewVolunteerApplication, User, VolunteerApplication, VolunteerApplicationRepository,
};
use sqlx::SqlitePool;

use crate::errors::{ShelterError, ShelterResult};
use crate::mailer::{EmailMessage, Mailer};
use crate::services::{notify, ActionOutcome};
use crate::templates;
use crate::workflow::{ApplicationAction, Workflow};

#[derive(Clone)]
pub struct VolunteerService {
    pool: SqlitePool,
    applications: VolunteerApplicationRepository,
    mailer: Arc<dyn Mailer>,
    shelter: ShelterConfig,
}

impl VolunteerService {
    pub fn new(pool: SqlitePool, mailer: Arc<dyn Mailer>, shelter: ShelterConfig) -> Self {
        Self {
            applications: VolunteerApplicationRepository::new(pool.clone()),
            pool,
            mailer,
            shelter,
        }
    }

    /// Public submission; linked to the applicant's account when signed in.
    pub async fn submit(
        &self,
        form: &NewVolunteerApplication,
        applicant: Option<&User>,
    ) -> ShelterResult<VolunteerApplication> {
        let email = required("email", &form.email, EMAIL_MAX)?;
        validate_email(&email)?;

        let application = NewVolunteerApplication {
            full_name: required("full_name", &form.full_name, NAME_MAX)?,
            email,
            phone: required("phone", &form.phone, PHONE_MAX)?,
            address: required("address", &form.address, ADDRESS_MAX)?,
            instagram: sanitize_optional(form.instagram.as_deref(), 100),
            team: form.team,
            experience: sanitize_input(&form.experience, TEXT_MAX),
            motivation: required("motivation", &form.motivation, TEXT_MAX)?,
            additional_info: sanitize_optional(form.additional_info.as_deref(), TEXT_MAX),
        };

        Ok(self
            .applications
            .create(&application, applicant.map(|user| user.id))
            .await?)
    }

    pub async fn list(&self) -> ShelterResult<Vec<VolunteerApplication>> {
        Ok(self.applications.list_recent_first().await?)
    }

    pub async fn get(&self, id: i64) -> ShelterResult<VolunteerApplication> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("volunteer application {id}")))
    }

    pub async fn schedule_interview(
        &self,
        id: i64,
        staff: &User,
        at: NaiveDateTime,
    ) -> ShelterResult<ActionOutcome<VolunteerApplication>> {
        let application = self
            .transition(id, ApplicationAction::ScheduleInterview, staff, Some(at), None)
            .await?;
        let message = templates::volunteer_interview(&self.shelter, &application, at);
        Ok(self.announce(application, message).await)
    }

    pub async fn approve(
        &self,
        id: i64,
        staff: &User,
        notes: Option<&str>,
    ) -> ShelterResult<ActionOutcome<VolunteerApplication>> {
        let application = self
            .transition(id, ApplicationAction::Approve, staff, None, notes)
            .await?;
        let message =
            templates::volunteer_approved(&self.shelter, &application, application.admin_notes.as_deref());
        Ok(self.announce(application, message).await)
    }

    pub async fn reject(
        &self,
        id: i64,
        staff: &User,
        notes: Option<&str>,
    ) -> ShelterResult<ActionOutcome<VolunteerApplication>> {
        let application = self
            .transition(id, ApplicationAction::Reject, staff, None, notes)
            .await?;
        let message =
            templates::volunteer_rejected(&self.shelter, &application, application.admin_notes.as_deref());
        Ok(self.announce(application, message).await)
    }

    /// Apply `action` and store the result. A decision taken after an
    /// interview also leaves an interview record with that outcome.
    async fn transition(
        &self,
        id: i64,
        action: ApplicationAction,
        staff: &User,
        interview_at: Option<NaiveDateTime>,
        notes: Option<&str>,
    ) -> ShelterResult<VolunteerApplication> {
        let application = self.get(id).await?;
        let from = application.status;
        let next = from.apply(action)?;
        let notes = sanitize_optional(notes, TEXT_MAX);

        let mut tx = self.pool.begin().await?;
        VolunteerApplicationRepository::set_status_in(
            &mut *tx,
            id,
            from,
            next,
            staff.id,
            interview_at,
            notes.as_deref(),
        )
        .await?;

        let result = match next {
            ApplicationStatus::Approved => Some(InterviewResult::Approved),
            ApplicationStatus::Rejected => Some(InterviewResult::Rejected),
            _ => None,
        };
        if let (ApplicationStatus::InterviewScheduled, Some(result)) = (from, result) {
            InterviewRepository::create_in(
                &mut *tx,
                &NewInterviewRecord {
                    subject: InterviewSubject::VolunteerApplication,
                    subject_id: id,
                    held_on: application
                        .interview_at
                        .map(|at| at.date())
                        .unwrap_or_else(|| Utc::now().date_naive()),
                    observations: notes.unwrap_or_default(),
                    result,
                    interviewer_id: Some(staff.id),
                },
            )
            .await?;
        }
        tx.commit().await?;

        self.get(id).await
    }

    async fn announce(
        &self,
        application: VolunteerApplication,
        message: EmailMessage,
    ) -> ActionOutcome<VolunteerApplication> {
        let mut outcome = ActionOutcome::new(application);
        notify(self.mailer.as_ref(), message, &mut outcome.warnings).await;
        outcome
    }
}
