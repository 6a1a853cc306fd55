//! Password reset token persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::entities::PasswordResetToken;
use crate::types::DatabaseResult;

#[derive(Clone)]
pub struct PasswordResetRepository {
    pool: SqlitePool,
}

impl PasswordResetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a fresh token, discarding any older ones for the same user.
    pub async fn replace_for_user(&self, user_id: i64, token: &str) -> DatabaseResult<PasswordResetToken> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(token)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PasswordResetToken {
            id: result.last_insert_rowid(),
            user_id,
            token: token.to_string(),
            created_at,
        })
    }

    pub async fn find_by_token(&self, token: &str) -> DatabaseResult<Option<PasswordResetToken>> {
        let row = sqlx::query(
            "SELECT id, user_id, token, created_at FROM password_reset_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_token).transpose()
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn map_token(row: &SqliteRow) -> DatabaseResult<PasswordResetToken> {
    Ok(PasswordResetToken {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        token: row.try_get("token")?,
        created_at: row.try_get("created_at")?,
    })
}
