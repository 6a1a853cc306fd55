//! Volunteer application persistence.

use chrono::{NaiveDateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{ApplicationStatus, NewVolunteerApplication, VolunteerApplication};
use crate::types::{DatabaseError, DatabaseResult};

const APPLICATION_SELECT: &str = "SELECT id, full_name, email, phone, address, instagram, team, experience, motivation, additional_info, submitted_at, status, interview_at, admin_notes, applicant_user_id, processed_by FROM volunteer_applications";

#[derive(Clone)]
pub struct VolunteerApplicationRepository {
    pool: SqlitePool,
}

impl VolunteerApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        application: &NewVolunteerApplication,
        applicant_user_id: Option<i64>,
    ) -> DatabaseResult<VolunteerApplication> {
        let result = sqlx::query(
            "INSERT INTO volunteer_applications
                (full_name, email, phone, address, instagram, team, experience, motivation, additional_info, submitted_at, status, applicant_user_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.address)
        .bind(&application.instagram)
        .bind(application.team.as_str())
        .bind(&application.experience)
        .bind(&application.motivation)
        .bind(&application.additional_info)
        .bind(Utc::now())
        .bind(ApplicationStatus::Pending.as_str())
        .bind(applicant_user_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(application_id = id, team = %application.team, "volunteer application received");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("volunteer application {id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<VolunteerApplication>> {
        let row = sqlx::query(&format!("{APPLICATION_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_application).transpose()
    }

    pub async fn list_recent_first(&self) -> DatabaseResult<Vec<VolunteerApplication>> {
        let rows = sqlx::query(&format!("{APPLICATION_SELECT} ORDER BY submitted_at DESC, id DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_application).collect()
    }

    /// Store a validated status together with the processing admin. Notes and
    /// interview time are only overwritten when provided. The write only
    /// applies while the stored status is still `from`.
    pub async fn set_status_in(
        conn: &mut SqliteConnection,
        id: i64,
        from: ApplicationStatus,
        to: ApplicationStatus,
        processed_by: i64,
        interview_at: Option<NaiveDateTime>,
        admin_notes: Option<&str>,
    ) -> DatabaseResult<()> {
        let result = sqlx::query(
            "UPDATE volunteer_applications SET
                status = ?,
                processed_by = ?,
                interview_at = COALESCE(?, interview_at),
                admin_notes = COALESCE(?, admin_notes)
             WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(processed_by)
        .bind(interview_at)
        .bind(admin_notes)
        .bind(id)
        .bind(from.as_str())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict(format!(
                "volunteer application {id} is no longer {from}"
            )));
        }

        info!(application_id = id, from = %from, to = %to, "volunteer application status changed");
        Ok(())
    }
}

fn map_application(row: &SqliteRow) -> DatabaseResult<VolunteerApplication> {
    let team: String = row.try_get("team")?;
    let status: String = row.try_get("status")?;

    Ok(VolunteerApplication {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        instagram: row.try_get("instagram")?,
        team: team.parse()?,
        experience: row.try_get("experience")?,
        motivation: row.try_get("motivation")?,
        additional_info: row.try_get("additional_info")?,
        submitted_at: row.try_get("submitted_at")?,
        status: status.parse()?,
        interview_at: row.try_get("interview_at")?,
        admin_notes: row.try_get("admin_notes")?,
        applicant_user_id: row.try_get("applicant_user_id")?,
        processed_by: row.try_get("processed_by")?,
    })
}
