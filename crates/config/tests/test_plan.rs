//! Loader behaviour for the `rescatando-config` crate: defaults, file
//! discovery, environment overrides and failure reporting.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use rescatando_config::{load, AppConfig, AuthConfig, HttpConfig, ShelterConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "RESCATANDO_CONFIG",
    "RESCATANDO__AUTH__SESSION_TTL_SECONDS",
    "RESCATANDO__AUTH__PASSWORD_RESET_TTL_SECONDS",
    "RESCATANDO__DATABASE__MAX_CONNECTIONS",
    "RESCATANDO__DATABASE__URL",
    "RESCATANDO__HTTP__ADDRESS",
    "RESCATANDO__HTTP__PORT",
    "RESCATANDO__HTTP__PUBLIC_BASE_URL",
    "RESCATANDO__MAIL__FROM_ADDRESS",
    "RESCATANDO__STORAGE__CONTRACTS_DIR",
    "RESCATANDO__SHELTER__ORGANIZATION_NAME",
    "RESCATANDO__SHELTER__CONTACT_HANDLE",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(config.database.max_connections, defaults.database.max_connections);
    assert_eq!(config.auth.session_ttl_seconds, defaults.auth.session_ttl_seconds);
    assert_eq!(
        config.auth.password_reset_ttl_seconds,
        defaults.auth.password_reset_ttl_seconds
    );
    assert_eq!(config.mail.from_address, defaults.mail.from_address);
    assert_eq!(config.storage.contracts_dir, defaults.storage.contracts_dir);
    assert_eq!(
        config.shelter.organization_name,
        defaults.shelter.organization_name
    );
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(temp_dir.path(), "rescatando.toml", "[http]\nport = 4242\n");
    write_config_file(temp_dir.path(), "config/rescatando.toml", "[http]\nport = 5151\n");

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "rescatando.toml",
        r#"
        [storage]
        contracts_dir = "/var/lib/rescatando/contracts"

        [shelter]
        organization_name = "Refugio Norte"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.storage.contracts_dir, "/var/lib/rescatando/contracts");
    assert_eq!(config.shelter.organization_name, "Refugio Norte");
    assert_eq!(config.shelter.contact_handle, defaults.shelter.contact_handle);
    assert_eq!(config.http.port, defaults.http.port);
}

#[test]
#[serial]
fn load_reads_explicit_config_path_from_environment() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(temp_dir.path(), "elsewhere/custom.toml", "[mail]\nfrom_address = \"adopciones@example.org\"\n");
    ctx.set_var(
        "RESCATANDO_CONFIG",
        temp_dir.path().join("elsewhere/custom.toml").display().to_string(),
    );

    let config = load().expect("explicit configuration file should load");
    assert_eq!(config.mail.from_address, "adopciones@example.org");
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(temp_dir.path(), "rescatando.toml", "[http]\nport = 3030\n");
    ctx.set_var("RESCATANDO__HTTP__PORT", "8080");
    ctx.set_var("RESCATANDO__DATABASE__URL", "sqlite://override.db");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.database.url, "sqlite://override.db");
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "rescatando.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration")
            || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn auth_config_defaults_match_reset_window() {
    let defaults = AuthConfig::default();
    assert_eq!(defaults.session_ttl_seconds, 86_400);
    assert_eq!(defaults.password_reset_ttl_seconds, 3_600);
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 7070);
    assert!(defaults.public_base_url.ends_with(":7070"));
}

#[test]
fn shelter_config_defaults_name_the_organisation() {
    let defaults = ShelterConfig::default();
    assert_eq!(defaults.organization_name, "RescatandoAndo Stgo");
}
