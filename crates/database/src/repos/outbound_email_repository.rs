//! Outbox for rendered emails.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::entities::{EmailStatus, OutboundEmail};
use crate::types::DatabaseResult;

#[derive(Clone)]
pub struct OutboundEmailRepository {
    pool: SqlitePool,
}

impl OutboundEmailRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        status: EmailStatus,
        error: Option<&str>,
    ) -> DatabaseResult<i64> {
        let result = sqlx::query(
            "INSERT INTO outbound_emails (recipient, subject, body, status, error, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(recipient)
        .bind(subject)
        .bind(body)
        .bind(status.as_str())
        .bind(error)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_for_recipient(&self, recipient: &str) -> DatabaseResult<Vec<OutboundEmail>> {
        let rows = sqlx::query(
            "SELECT id, recipient, subject, body, status, error, created_at
             FROM outbound_emails WHERE recipient = ? ORDER BY id ASC",
        )
        .bind(recipient)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_email).collect()
    }
}

fn map_email(row: &SqliteRow) -> DatabaseResult<OutboundEmail> {
    let status: String = row.try_get("status")?;

    Ok(OutboundEmail {
        id: row.try_get("id")?,
        recipient: row.try_get("recipient")?,
        subject: row.try_get("subject")?,
        body: row.try_get("body")?,
        status: status.parse()?,
        error: row.try_get("error")?,
        created_at: row.try_get("created_at")?,
    })
}
