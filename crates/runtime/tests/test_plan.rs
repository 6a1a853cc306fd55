use std::path::Path;

use anyhow::{Context, Result};
use rescatando_backend_runtime::BackendServices;
use rescatando_config::AppConfig;
use tempfile::TempDir;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(root: &Path, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = sqlite_url(&root.join("runtime/init.db"));
    config.database.max_connections = max_connections;
    config.storage.contracts_dir = root.join("contracts").to_string_lossy().into_owned();
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_runs_migrations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(temp_dir.path(), 4);

    let services = initialise(&config).await?;
    for expected in ["users", "animals", "adoption_requests", "adoptions", "contracts"] {
        let table: String = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(expected)
        .fetch_one(&services.db_pool)
        .await?;
        assert_eq!(expected, table);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_is_repeatable_on_the_same_database() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(temp_dir.path(), 2);

    let first = initialise(&config).await?;
    first
        .authenticator
        .ensure_admin("admin", "Administrador", "admin@rescatando.com", "admin123")
        .await?;
    first.db_pool.close().await;

    let second = initialise(&config).await?;
    let users = second.shelter.users.list().await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].account, "admin");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_reports_unusable_database_paths() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory")?;

    let mut config = build_config(temp_dir.path(), 1);
    config.database.url = sqlite_url(&blocker.join("init.db"));

    let error = initialise(&config)
        .await
        .err()
        .expect("database directory cannot be created under a file");
    assert!(error.to_string().contains("failed to initialise backend services"));

    Ok(())
}
