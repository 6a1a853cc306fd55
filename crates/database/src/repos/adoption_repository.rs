//! Adoption persistence.

use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{Adoption, AdoptionStatus, AdoptionSummary};
use crate::types::{DatabaseError, DatabaseResult};

const ADOPTION_COLUMNS: &str = "o.id, o.animal_id, o.adopter_id, o.request_id, o.status, o.adopted_on, o.contract_on, o.completed_on, o.approved_by";

#[derive(Debug, Clone)]
pub struct NewAdoption {
    pub animal_id: i64,
    pub adopter_id: i64,
    pub request_id: Option<i64>,
    pub adopted_on: NaiveDate,
    pub approved_by: Option<i64>,
}

#[derive(Clone)]
pub struct AdoptionRepository {
    pool: SqlitePool,
}

impl AdoptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_in(conn: &mut SqliteConnection, adoption: &NewAdoption) -> DatabaseResult<Adoption> {
        let result = sqlx::query(
            "INSERT INTO adoptions (animal_id, adopter_id, request_id, status, adopted_on, approved_by)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(adoption.animal_id)
        .bind(adoption.adopter_id)
        .bind(adoption.request_id)
        .bind(AdoptionStatus::InProgress.as_str())
        .bind(adoption.adopted_on)
        .bind(adoption.approved_by)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(adoption_id = id, animal_id = adoption.animal_id, "adoption opened");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("adoption {id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Adoption>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<Adoption>> {
        let row = sqlx::query(&format!("SELECT {ADOPTION_COLUMNS} FROM adoptions o WHERE o.id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_adoption).transpose()
    }

    pub async fn count_for_animal_in(conn: &mut SqliteConnection, animal_id: i64) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM adoptions WHERE animal_id = ?")
            .bind(animal_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    pub async fn list_summaries(&self) -> DatabaseResult<Vec<AdoptionSummary>> {
        let rows = sqlx::query(&summary_select("ORDER BY o.adopted_on DESC, o.id DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_summary).collect()
    }

    pub async fn list_summaries_for_adopter(&self, adopter_id: i64) -> DatabaseResult<Vec<AdoptionSummary>> {
        let rows = sqlx::query(&summary_select(
            "WHERE o.adopter_id = ? ORDER BY o.adopted_on DESC, o.id DESC",
        ))
        .bind(adopter_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_summary).collect()
    }

    pub async fn find_summary(&self, id: i64) -> DatabaseResult<Option<AdoptionSummary>> {
        let row = sqlx::query(&summary_select("WHERE o.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_summary).transpose()
    }

    pub async fn mark_contract_generated_in(
        conn: &mut SqliteConnection,
        id: i64,
        on: NaiveDate,
    ) -> DatabaseResult<()> {
        let result = sqlx::query(
            "UPDATE adoptions SET status = ?, contract_on = ? WHERE id = ? AND status = ?",
        )
        .bind(AdoptionStatus::ContractGenerated.as_str())
        .bind(on)
        .bind(id)
        .bind(AdoptionStatus::InProgress.as_str())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict(format!("adoption {id} is no longer in_progress")));
        }
        info!(adoption_id = id, "adoption contract generated");
        Ok(())
    }

    pub async fn mark_completed(&self, id: i64, on: NaiveDate) -> DatabaseResult<()> {
        let result = sqlx::query(
            "UPDATE adoptions SET status = ?, completed_on = ? WHERE id = ? AND status = ?",
        )
        .bind(AdoptionStatus::Completed.as_str())
        .bind(on)
        .bind(id)
        .bind(AdoptionStatus::ContractGenerated.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict(format!(
                "adoption {id} is no longer contract_generated"
            )));
        }
        info!(adoption_id = id, "adoption completed");
        Ok(())
    }

    pub async fn delete_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM adoptions WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("adoption {id}")));
        }
        info!(adoption_id = id, "deleted adoption");
        Ok(())
    }
}

fn summary_select(tail: &str) -> String {
    format!(
        "SELECT {ADOPTION_COLUMNS}, a.name AS animal_name, d.name AS adopter_name
         FROM adoptions o
         JOIN animals a ON a.id = o.animal_id
         JOIN adopters d ON d.id = o.adopter_id
         {tail}"
    )
}

fn map_adoption(row: &SqliteRow) -> DatabaseResult<Adoption> {
    let status: String = row.try_get("status")?;

    Ok(Adoption {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        adopter_id: row.try_get("adopter_id")?,
        request_id: row.try_get("request_id")?,
        status: status.parse()?,
        adopted_on: row.try_get("adopted_on")?,
        contract_on: row.try_get("contract_on")?,
        completed_on: row.try_get("completed_on")?,
        approved_by: row.try_get("approved_by")?,
    })
}

fn map_summary(row: &SqliteRow) -> DatabaseResult<AdoptionSummary> {
    Ok(AdoptionSummary {
        adoption: map_adoption(row)?,
        animal_name: row.try_get("animal_name")?,
        adopter_name: row.try_get("adopter_name")?,
    })
}
