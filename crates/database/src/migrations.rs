//! Database migrations

use anyhow::Context;
use sqlx::{migrate::Migrator, SqlitePool};
use tracing::info;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn migrations_create_the_shelter_schema() {
        let (pool, _dir) = test_pool().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name != 'sqlite_sequence' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for expected in [
            "adopters",
            "adoption_requests",
            "adoptions",
            "animals",
            "contracts",
            "donations",
            "foster_homes",
            "interviews",
            "medical_records",
            "outbound_emails",
            "password_reset_tokens",
            "sessions",
            "users",
            "volunteer_applications",
            "volunteers",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
        }
    }
}
