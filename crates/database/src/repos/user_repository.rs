//! User repository for database operations.

use chrono::Utc;
use cuid2::CuidConstructor;
use once_cell::sync::Lazy;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{NewUser, User, UserProfileUpdate, UserRole};
use crate::types::{DatabaseError, DatabaseResult};

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

const USER_SELECT: &str = "SELECT id, public_id, name, account, email, phone, address, role, avatar, created_at FROM users";

/// Records that keep a user from being deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserDependents {
    pub volunteers: i64,
    pub adopters: i64,
    pub donations: i64,
}

impl UserDependents {
    pub fn is_empty(&self) -> bool {
        self.volunteers == 0 && self.adopters == 0 && self.donations == 0
    }
}

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &NewUser) -> DatabaseResult<User> {
        let mut conn = self.pool.acquire().await?;
        Self::create_in(&mut conn, request).await
    }

    /// Insert a user on an existing connection or transaction.
    pub async fn create_in(conn: &mut SqliteConnection, request: &NewUser) -> DatabaseResult<User> {
        let public_id = CUID.create_id();

        let result = sqlx::query(
            "INSERT INTO users (public_id, name, account, email, phone, address, role, avatar, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.account)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(request.role.as_str())
        .bind(request.avatar.as_str())
        .bind(&request.password_hash)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(user_id = id, account = %request.account, role = %request.role, "created user");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    pub async fn find_by_account(&self, account: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE account = ?"))
            .bind(account)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE email = ? COLLATE NOCASE"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    /// Returns the user id and stored password hash for an account.
    pub async fn credentials_for_account(&self, account: &str) -> DatabaseResult<Option<(i64, String)>> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE account = ?")
            .bind(account)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some((row.try_get("id")?, row.try_get("password_hash")?))),
            None => Ok(None),
        }
    }

    pub async fn account_taken(&self, account: &str) -> DatabaseResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE account = ?")
            .bind(account)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Whether another user already uses `email`; `except` excludes the caller.
    pub async fn email_taken(&self, email: &str, except: Option<i64>) -> DatabaseResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE email = ? COLLATE NOCASE AND id != COALESCE(?, -1)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn list_by_name(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(&format!("{USER_SELECT} ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_user).collect()
    }

    pub async fn first_with_role(&self, role: UserRole) -> DatabaseResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        Self::first_with_role_in(&mut conn, role).await
    }

    pub async fn first_with_role_in(
        conn: &mut SqliteConnection,
        role: UserRole,
    ) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE role = ? ORDER BY id ASC LIMIT 1"))
            .bind(role.as_str())
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    pub async fn update_profile(&self, id: i64, update: &UserProfileUpdate) -> DatabaseResult<User> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, email = ?, phone = ?, address = ?, avatar = ? WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(update.avatar.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    pub async fn update_password_hash(&self, id: i64, password_hash: &str) -> DatabaseResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::update_password_hash_in(&mut conn, id, password_hash).await
    }

    pub async fn update_password_hash_in(
        conn: &mut SqliteConnection,
        id: i64,
        password_hash: &str,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    pub async fn update_role(&self, id: i64, role: UserRole) -> DatabaseResult<()> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }
        info!(user_id = id, role = %role, "changed user role");
        Ok(())
    }

    pub async fn dependents(&self, id: i64) -> DatabaseResult<UserDependents> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM volunteers WHERE user_id = ?1) AS volunteers,
                (SELECT COUNT(*) FROM adopters WHERE user_id = ?1) AS adopters,
                (SELECT COUNT(*) FROM donations WHERE user_id = ?1) AS donations",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserDependents {
            volunteers: row.try_get("volunteers")?,
            adopters: row.try_get("adopters")?,
            donations: row.try_get("donations")?,
        })
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }
        info!(user_id = id, "deleted user");
        Ok(())
    }
}

fn map_user(row: &SqliteRow) -> DatabaseResult<User> {
    let role: String = row.try_get("role")?;
    let avatar: String = row.try_get("avatar")?;

    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        account: row.try_get("account")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        role: role.parse()?,
        avatar: avatar.parse()?,
        created_at: row.try_get("created_at")?,
    })
}
