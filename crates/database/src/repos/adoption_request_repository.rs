//! Adoption request persistence.
//!
//! Status changes are written by the workflow layer, which validates the
//! transition first. The write is guarded by the status the transition was
//! validated against, so a concurrent change makes it fail instead of
//! overwriting the newer status.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{AdoptionRequest, AdoptionRequestSummary, RequestStatus};
use crate::types::{DatabaseError, DatabaseResult};

const REQUEST_COLUMNS: &str = "r.id, r.animal_id, r.adopter_id, r.status, r.submitted_on, r.interview_at, r.meeting_link, r.interview_notes, r.rejection_reason, r.approved_on, r.processed_by";

/// Column changes that accompany a status write. Unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct RequestStatusChange {
    pub interview_at: Option<NaiveDateTime>,
    pub meeting_link: Option<String>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_on: Option<NaiveDate>,
    pub processed_by: Option<i64>,
}

#[derive(Clone)]
pub struct AdoptionRequestRepository {
    pool: SqlitePool,
}

impl AdoptionRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_in(
        conn: &mut SqliteConnection,
        animal_id: i64,
        adopter_id: i64,
        submitted_on: NaiveDate,
    ) -> DatabaseResult<AdoptionRequest> {
        let result = sqlx::query(
            "INSERT INTO adoption_requests (animal_id, adopter_id, status, submitted_on) VALUES (?, ?, ?, ?)",
        )
        .bind(animal_id)
        .bind(adopter_id)
        .bind(RequestStatus::Pending.as_str())
        .bind(submitted_on)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(request_id = id, animal_id, adopter_id, "adoption request submitted");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("adoption request {id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<AdoptionRequest>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> DatabaseResult<Option<AdoptionRequest>> {
        let row = sqlx::query(&format!("SELECT {REQUEST_COLUMNS} FROM adoption_requests r WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_request).transpose()
    }

    pub async fn find_summary(&self, id: i64) -> DatabaseResult<Option<AdoptionRequestSummary>> {
        let row = sqlx::query(&summary_select("WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_summary).transpose()
    }

    /// Every request, newest first, with animal and adopter names.
    pub async fn list_summaries(&self) -> DatabaseResult<Vec<AdoptionRequestSummary>> {
        let rows = sqlx::query(&summary_select("ORDER BY r.submitted_on DESC, r.id DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_summary).collect()
    }

    pub async fn list_summaries_for_adopter(
        &self,
        adopter_id: i64,
    ) -> DatabaseResult<Vec<AdoptionRequestSummary>> {
        let rows = sqlx::query(&summary_select(
            "WHERE r.adopter_id = ? ORDER BY r.submitted_on DESC, r.id DESC",
        ))
        .bind(adopter_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_summary).collect()
    }

    pub async fn set_status(
        &self,
        id: i64,
        from: RequestStatus,
        to: RequestStatus,
        change: &RequestStatusChange,
    ) -> DatabaseResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::set_status_in(&mut conn, id, from, to, change).await
    }

    /// Move a request from `from` to `to`. Fails with
    /// [`DatabaseError::Conflict`] when the stored status is no longer `from`.
    pub async fn set_status_in(
        conn: &mut SqliteConnection,
        id: i64,
        from: RequestStatus,
        to: RequestStatus,
        change: &RequestStatusChange,
    ) -> DatabaseResult<()> {
        let result = sqlx::query(
            "UPDATE adoption_requests SET
                status = ?,
                interview_at = COALESCE(?, interview_at),
                meeting_link = COALESCE(?, meeting_link),
                interview_notes = COALESCE(?, interview_notes),
                rejection_reason = COALESCE(?, rejection_reason),
                approved_on = COALESCE(?, approved_on),
                processed_by = COALESCE(?, processed_by)
             WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(change.interview_at)
        .bind(&change.meeting_link)
        .bind(&change.interview_notes)
        .bind(&change.rejection_reason)
        .bind(change.approved_on)
        .bind(change.processed_by)
        .bind(id)
        .bind(from.as_str())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict(format!(
                "adoption request {id} is no longer {from}"
            )));
        }

        info!(request_id = id, from = %from, to = %to, "adoption request status changed");
        Ok(())
    }

    pub async fn delete_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM adoption_requests WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("adoption request {id}")));
        }
        info!(request_id = id, "deleted adoption request");
        Ok(())
    }
}

fn summary_select(tail: &str) -> String {
    format!(
        "SELECT {REQUEST_COLUMNS}, a.name AS animal_name, d.name AS adopter_name, d.email AS adopter_email
         FROM adoption_requests r
         JOIN animals a ON a.id = r.animal_id
         JOIN adopters d ON d.id = r.adopter_id
         {tail}"
    )
}

fn map_request(row: &SqliteRow) -> DatabaseResult<AdoptionRequest> {
    let status: String = row.try_get("status")?;

    Ok(AdoptionRequest {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        adopter_id: row.try_get("adopter_id")?,
        status: status.parse()?,
        submitted_on: row.try_get("submitted_on")?,
        interview_at: row.try_get("interview_at")?,
        meeting_link: row.try_get("meeting_link")?,
        interview_notes: row.try_get("interview_notes")?,
        rejection_reason: row.try_get("rejection_reason")?,
        approved_on: row.try_get("approved_on")?,
        processed_by: row.try_get("processed_by")?,
    })
}

fn map_summary(row: &SqliteRow) -> DatabaseResult<AdoptionRequestSummary> {
    Ok(AdoptionRequestSummary {
        request: map_request(row)?,
        animal_name: row.try_get("animal_name")?,
        adopter_name: row.try_get("adopter_name")?,
        adopter_email: row.try_get("adopter_email")?,
    })
}
