//! Interview record persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{InterviewRecord, InterviewResult, InterviewSubject, NewInterviewRecord};
use crate::types::{DatabaseError, DatabaseResult};

const INTERVIEW_SELECT: &str = "SELECT i.id, i.subject,
        COALESCE(i.adoption_request_id, i.volunteer_application_id) AS subject_id,
        COALESCE(d.name, v.full_name, '') AS interviewee,
        i.held_on, i.observations, i.result, i.interviewer_id, i.recorded_at
     FROM interviews i
     LEFT JOIN adoption_requests r ON r.id = i.adoption_request_id
     LEFT JOIN adopters d ON d.id = r.adopter_id
     LEFT JOIN volunteer_applications v ON v.id = i.volunteer_application_id";

#[derive(Clone)]
pub struct InterviewRepository {
    pool: SqlitePool,
}

impl InterviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_in(
        conn: &mut SqliteConnection,
        record: &NewInterviewRecord,
    ) -> DatabaseResult<InterviewRecord> {
        let (request_id, application_id) = match record.subject {
            InterviewSubject::AdoptionRequest => (Some(record.subject_id), None),
            InterviewSubject::VolunteerApplication => (None, Some(record.subject_id)),
        };

        let result = sqlx::query(
            "INSERT INTO interviews
                (subject, adoption_request_id, volunteer_application_id, held_on, observations, result, interviewer_id, recorded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.subject.as_str())
        .bind(request_id)
        .bind(application_id)
        .bind(record.held_on)
        .bind(&record.observations)
        .bind(record.result.as_str())
        .bind(record.interviewer_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(interview_id = id, subject = %record.subject, subject_id = record.subject_id, "interview recorded");

        let row = sqlx::query(&format!("{INTERVIEW_SELECT} WHERE i.id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("interview {id}")))?;
        map_interview(&row)
    }

    /// Record the decision on every still-pending interview of an adoption
    /// request. Returns the number of interviews updated.
    pub async fn settle_for_request_in(
        conn: &mut SqliteConnection,
        request_id: i64,
        result: InterviewResult,
    ) -> DatabaseResult<u64> {
        let outcome = sqlx::query(
            "UPDATE interviews SET result = ? WHERE adoption_request_id = ? AND result = ?",
        )
        .bind(result.as_str())
        .bind(request_id)
        .bind(InterviewResult::Pending.as_str())
        .execute(&mut *conn)
        .await?;
        Ok(outcome.rows_affected())
    }

    /// Every interview, most recent first.
    pub async fn list_recent_first(&self) -> DatabaseResult<Vec<InterviewRecord>> {
        let rows = sqlx::query(&format!("{INTERVIEW_SELECT} ORDER BY i.held_on DESC, i.id DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_interview).collect()
    }

    pub async fn list_for(
        &self,
        subject: InterviewSubject,
        subject_id: i64,
    ) -> DatabaseResult<Vec<InterviewRecord>> {
        let column = match subject {
            InterviewSubject::AdoptionRequest => "i.adoption_request_id",
            InterviewSubject::VolunteerApplication => "i.volunteer_application_id",
        };
        let rows = sqlx::query(&format!("{INTERVIEW_SELECT} WHERE {column} = ? ORDER BY i.id"))
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_interview).collect()
    }
}

fn map_interview(row: &SqliteRow) -> DatabaseResult<InterviewRecord> {
    let subject: String = row.try_get("subject")?;
    let result: String = row.try_get("result")?;

    Ok(InterviewRecord {
        id: row.try_get("id")?,
        subject: subject.parse()?,
        subject_id: row.try_get("subject_id")?,
        interviewee: row.try_get("interviewee")?,
        held_on: row.try_get("held_on")?,
        observations: row.try_get("observations")?,
        result: result.parse()?,
        interviewer_id: row.try_get("interviewer_id")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}
