//! Foster homes and the volunteers that run them.

use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{FosterHome, NewFosterHome, Volunteer};
use crate::types::{DatabaseError, DatabaseResult};

const HOME_SELECT: &str =
    "SELECT id, volunteer_id, address, description, capacity, status FROM foster_homes";
const VOLUNTEER_SELECT: &str = "SELECT id, user_id, volunteer_type, joined_on FROM volunteers";

#[derive(Clone)]
pub struct FosterHomeRepository {
    pool: SqlitePool,
}

impl FosterHomeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, home: &NewFosterHome) -> DatabaseResult<FosterHome> {
        let mut conn = self.pool.acquire().await?;
        Self::create_in(&mut conn, home).await
    }

    pub async fn create_in(conn: &mut SqliteConnection, home: &NewFosterHome) -> DatabaseResult<FosterHome> {
        let result = sqlx::query(
            "INSERT INTO foster_homes (volunteer_id, address, description, capacity, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(home.volunteer_id)
        .bind(&home.address)
        .bind(&home.description)
        .bind(home.capacity)
        .bind(&home.status)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(foster_home_id = id, volunteer_id = home.volunteer_id, "created foster home");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("foster home {id}")))
    }

    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<FosterHome>> {
        let row = sqlx::query(&format!("{HOME_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_home).transpose()
    }

    pub async fn first_in(conn: &mut SqliteConnection) -> DatabaseResult<Option<FosterHome>> {
        let row = sqlx::query(&format!("{HOME_SELECT} ORDER BY id ASC LIMIT 1"))
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_home).transpose()
    }

    pub async fn list(&self) -> DatabaseResult<Vec<FosterHome>> {
        let rows = sqlx::query(&format!("{HOME_SELECT} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_home).collect()
    }

    pub async fn create_volunteer(
        &self,
        user_id: i64,
        volunteer_type: &str,
        joined_on: NaiveDate,
    ) -> DatabaseResult<Volunteer> {
        let mut conn = self.pool.acquire().await?;
        Self::create_volunteer_in(&mut conn, user_id, volunteer_type, joined_on).await
    }

    pub async fn create_volunteer_in(
        conn: &mut SqliteConnection,
        user_id: i64,
        volunteer_type: &str,
        joined_on: NaiveDate,
    ) -> DatabaseResult<Volunteer> {
        let result = sqlx::query(
            "INSERT INTO volunteers (user_id, volunteer_type, joined_on) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(volunteer_type)
        .bind(joined_on)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(volunteer_id = id, user_id, "registered volunteer");

        Ok(Volunteer {
            id,
            user_id,
            volunteer_type: volunteer_type.to_string(),
            joined_on,
        })
    }

    pub async fn first_volunteer_in(conn: &mut SqliteConnection) -> DatabaseResult<Option<Volunteer>> {
        let row = sqlx::query(&format!("{VOLUNTEER_SELECT} ORDER BY id ASC LIMIT 1"))
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_volunteer).transpose()
    }

    pub async fn list_volunteers(&self) -> DatabaseResult<Vec<Volunteer>> {
        let rows = sqlx::query(&format!("{VOLUNTEER_SELECT} ORDER BY joined_on ASC, id ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_volunteer).collect()
    }
}

fn map_home(row: &SqliteRow) -> DatabaseResult<FosterHome> {
    Ok(FosterHome {
        id: row.try_get("id")?,
        volunteer_id: row.try_get("volunteer_id")?,
        address: row.try_get("address")?,
        description: row.try_get("description")?,
        capacity: row.try_get("capacity")?,
        status: row.try_get("status")?,
    })
}

fn map_volunteer(row: &SqliteRow) -> DatabaseResult<Volunteer> {
    Ok(Volunteer {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        volunteer_type: row.try_get("volunteer_type")?,
        joined_on: row.try_get("joined_on")?,
    })
}
