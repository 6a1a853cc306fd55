use anyhow::{Context, Result};
use rescatando_auth::Authenticator;
use rescatando_config::AppConfig;
use rescatando_database::initialize_database;
use rescatando_shelter::ShelterServices;
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
    pub shelter: ShelterServices,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to prepare the shelter database")?;

        let authenticator = Authenticator::new(db_pool.clone(), config.auth.clone());
        let shelter = ShelterServices::from_config(db_pool.clone(), authenticator.clone(), config);

        info!(
            contracts_dir = %config.storage.contracts_dir,
            organization = %config.shelter.organization_name,
            "shelter services ready"
        );

        Ok(Self {
            db_pool,
            authenticator,
            shelter,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
