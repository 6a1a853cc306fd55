use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "rescatando.toml",
    "config/rescatando.toml",
    "crates/config/rescatando.toml",
    "../rescatando.toml",
    "../config/rescatando.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub storage: StorageConfig,
    pub shelter: ShelterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    /// Base URL used when links are rendered into outgoing emails.
    pub public_base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
            public_base_url: "http://127.0.0.1:7070".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://rescatando.db".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_password_reset_ttl")]
    pub password_reset_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: Self::default_session_ttl(),
            password_reset_ttl_seconds: Self::default_password_reset_ttl(),
        }
    }
}

impl AuthConfig {
    fn default_session_ttl() -> u64 {
        86_400
    }

    /// Reset links stay valid for one hour.
    fn default_password_reset_ttl() -> u64 {
        3_600
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: "no-reply@rescatando.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that receives rendered adoption contracts.
    pub contracts_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            contracts_dir: "media/contracts".to_string(),
        }
    }
}

/// Organisation details printed on contracts and in email footers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterConfig {
    pub organization_name: String,
    pub contact_handle: String,
}

impl Default for ShelterConfig {
    fn default() -> Self {
        Self {
            organization_name: "RescatandoAndo Stgo".to_string(),
            contact_handle: "@rescatandoando.stgo".to_string(),
        }
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use rescatando_config::load;
///
/// std::env::remove_var("RESCATANDO_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("http.public_base_url", defaults.http.public_base_url.clone())?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default(
            "auth.session_ttl_seconds",
            clamp_to_i64(defaults.auth.session_ttl_seconds),
        )?
        .set_default(
            "auth.password_reset_ttl_seconds",
            clamp_to_i64(defaults.auth.password_reset_ttl_seconds),
        )?
        .set_default("mail.from_address", defaults.mail.from_address.clone())?
        .set_default("storage.contracts_dir", defaults.storage.contracts_dir.clone())?
        .set_default(
            "shelter.organization_name",
            defaults.shelter.organization_name.clone(),
        )?
        .set_default("shelter.contact_handle", defaults.shelter.contact_handle.clone())?;

    let environment_overrides = config::Environment::with_prefix("RESCATANDO").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RESCATANDO_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RESCATANDO_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    let max_ttl = i64::MAX as u64;
    config.auth.session_ttl_seconds = config.auth.session_ttl_seconds.min(max_ttl);
    config.auth.password_reset_ttl_seconds = config.auth.password_reset_ttl_seconds.min(max_ttl);

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
