use chrono::{Duration, Utc};
use rescatando_auth::{AuthError, Authenticator, ProfileChanges, Registration};
use rescatando_config::AuthConfig;
use rescatando_database::{initialize_database, Avatar, UserRole};
use rescatando_config::DatabaseConfig;
use sqlx::{Row, SqlitePool};
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("auth.sqlite");
        let pool = initialize_database(&DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
        })
        .await?;

        let authenticator = Authenticator::new(
            pool.clone(),
            AuthConfig {
                session_ttl_seconds: 3_600,
                password_reset_ttl_seconds: 3_600,
            },
        );

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }

    fn registration(account: &str) -> Registration {
        Registration {
            name: "Ana Pérez".into(),
            account: account.into(),
            email: format!("{account}@example.cl"),
            password: "secreto".into(),
            password_confirmation: "secreto".into(),
            phone: Some("+56911112222".into()),
            address: None,
            avatar: Avatar::Rabbit,
        }
    }
}

#[tokio::test]
async fn register_hashes_password_and_assigns_user_role() -> TestResult {
    let ctx = TestContext::new().await?;

    let user = ctx.authenticator.register(&TestContext::registration("ana")).await?;
    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.avatar, Avatar::Rabbit);

    let row = sqlx::query("SELECT password_hash FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_one(&ctx.pool)
        .await?;
    let hash: String = row.get("password_hash");
    assert!(hash.starts_with("$argon2"), "password must be stored as an argon2 hash");

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_account_and_email() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator.register(&TestContext::registration("ana")).await?;

    let error = ctx
        .authenticator
        .register(&TestContext::registration("ana"))
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::UserExists("account")));

    let mut same_email = TestContext::registration("otra");
    same_email.email = "ana@example.cl".into();
    let error = ctx.authenticator.register(&same_email).await.unwrap_err();
    assert!(matches!(error, AuthError::UserExists("email")));

    Ok(())
}

#[tokio::test]
async fn register_validates_form() -> TestResult {
    let ctx = TestContext::new().await?;

    let mut bad_email = TestContext::registration("ana");
    bad_email.email = "ana-at-example".into();
    assert!(matches!(
        ctx.authenticator.register(&bad_email).await,
        Err(AuthError::Validation(_))
    ));

    let mut short = TestContext::registration("ana");
    short.password = "abc".into();
    short.password_confirmation = "abc".into();
    assert!(matches!(
        ctx.authenticator.register(&short).await,
        Err(AuthError::Validation(_))
    ));

    let mut mismatch = TestContext::registration("ana");
    mismatch.password_confirmation = "otro-secreto".into();
    assert!(matches!(
        ctx.authenticator.register(&mismatch).await,
        Err(AuthError::Validation(_))
    ));

    Ok(())
}

#[tokio::test]
async fn login_issues_session_that_authenticates() -> TestResult {
    let ctx = TestContext::new().await?;
    let registered = ctx.authenticator.register(&TestContext::registration("ana")).await?;

    let (user, session) = ctx.authenticator.login("ana", "secreto").await?;
    assert_eq!(user.id, registered.id);
    assert!(session.expires_at > Utc::now());

    let (authenticated, _) = ctx.authenticator.authenticate_token(&session.token).await?;
    assert_eq!(authenticated.public_id, registered.public_id);

    ctx.authenticator.logout(&session.token).await?;
    assert!(matches!(
        ctx.authenticator.authenticate_token(&session.token).await,
        Err(AuthError::SessionNotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_account() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator.register(&TestContext::registration("ana")).await?;

    assert!(matches!(
        ctx.authenticator.login("ana", "incorrecta").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        ctx.authenticator.login("nadie", "secreto").await,
        Err(AuthError::InvalidCredentials)
    ));

    Ok(())
}

#[tokio::test]
async fn expired_session_is_removed() -> TestResult {
    let ctx = TestContext::new().await?;
    let user = ctx.authenticator.register(&TestContext::registration("ana")).await?;

    let past = Utc::now() - Duration::minutes(5);
    sqlx::query("INSERT INTO sessions (user_id, token, created_at, expires_at) VALUES (?, 'stale', ?, ?)")
        .bind(user.id)
        .bind(past.to_rfc3339())
        .bind(past.to_rfc3339())
        .execute(&ctx.pool)
        .await?;

    assert!(matches!(
        ctx.authenticator.authenticate_token("stale").await,
        Err(AuthError::SessionExpired)
    ));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE token = 'stale'")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(remaining, 0);

    Ok(())
}

#[tokio::test]
async fn password_reset_round_trip_consumes_token() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator.register(&TestContext::registration("ana")).await?;

    let (user, token) = ctx.authenticator.request_password_reset("ana@example.cl").await?;
    assert_eq!(user.account, "ana");

    ctx.authenticator
        .reset_password(&token.token, "nuevo-secreto", "nuevo-secreto")
        .await?;

    assert!(ctx.authenticator.login("ana", "nuevo-secreto").await.is_ok());
    assert!(matches!(
        ctx.authenticator.reset_password(&token.token, "otro123", "otro123").await,
        Err(AuthError::InvalidResetToken)
    ));

    Ok(())
}

#[tokio::test]
async fn password_reset_rejects_unknown_email_and_expired_token() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator.register(&TestContext::registration("ana")).await?;

    assert!(matches!(
        ctx.authenticator.request_password_reset("nadie@example.cl").await,
        Err(AuthError::UnknownEmail)
    ));

    let (_, token) = ctx.authenticator.request_password_reset("ana@example.cl").await?;
    let two_hours_ago = Utc::now() - Duration::hours(2);
    sqlx::query("UPDATE password_reset_tokens SET created_at = ? WHERE id = ?")
        .bind(two_hours_ago)
        .bind(token.id)
        .execute(&ctx.pool)
        .await?;

    assert!(matches!(
        ctx.authenticator.validate_reset_token(&token.token).await,
        Err(AuthError::ResetTokenExpired)
    ));

    Ok(())
}

#[tokio::test]
async fn profile_update_changes_fields_and_optionally_password() -> TestResult {
    let ctx = TestContext::new().await?;
    let user = ctx.authenticator.register(&TestContext::registration("ana")).await?;

    let updated = ctx
        .authenticator
        .update_profile(
            &user,
            &ProfileChanges {
                name: "Ana María".into(),
                email: "ana.maria@example.cl".into(),
                phone: None,
                address: Some("Av. Siempre Viva 123".into()),
                avatar: Avatar::Turtle,
                new_password: Some("cambiada".into()),
                password_confirmation: Some("cambiada".into()),
            },
        )
        .await?;

    assert_eq!(updated.name, "Ana María");
    assert_eq!(updated.avatar, Avatar::Turtle);
    assert!(ctx.authenticator.login("ana", "cambiada").await.is_ok());

    Ok(())
}

#[tokio::test]
async fn ensure_admin_is_idempotent() -> TestResult {
    let ctx = TestContext::new().await?;

    let created = ctx
        .authenticator
        .ensure_admin("admin", "Administrador", "admin@rescatando.com", "admin123")
        .await?;
    assert_eq!(created.map(|u| u.role), Some(UserRole::Admin));

    let again = ctx
        .authenticator
        .ensure_admin("admin", "Administrador", "admin@rescatando.com", "admin123")
        .await?;
    assert!(again.is_none());

    Ok(())
}
