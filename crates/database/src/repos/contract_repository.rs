//! Adoption contract persistence.

use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{Contract, SignatoryParty};
use crate::types::{DatabaseError, DatabaseResult};

const CONTRACT_SELECT: &str = "SELECT id, adoption_id, adopter_id, generated_on, document_path, adopter_signed, adopter_signed_on, admin_signed, admin_signed_on, accepts_follow_up, care_commitment FROM contracts";

#[derive(Debug, Clone)]
pub struct NewContract {
    pub adoption_id: i64,
    pub adopter_id: i64,
    pub generated_on: NaiveDate,
    pub accepts_follow_up: bool,
    pub care_commitment: String,
}

#[derive(Clone)]
pub struct ContractRepository {
    pool: SqlitePool,
}

impl ContractRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_in(conn: &mut SqliteConnection, contract: &NewContract) -> DatabaseResult<Contract> {
        let result = sqlx::query(
            "INSERT INTO contracts (adoption_id, adopter_id, generated_on, accepts_follow_up, care_commitment)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(contract.adoption_id)
        .bind(contract.adopter_id)
        .bind(contract.generated_on)
        .bind(contract.accepts_follow_up)
        .bind(&contract.care_commitment)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(contract_id = id, adoption_id = contract.adoption_id, "contract created");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("contract {id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Contract>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<Contract>> {
        let row = sqlx::query(&format!("{CONTRACT_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_contract).transpose()
    }

    /// Most recent contract of an adoption.
    pub async fn latest_for_adoption(&self, adoption_id: i64) -> DatabaseResult<Option<Contract>> {
        let row = sqlx::query(&format!(
            "{CONTRACT_SELECT} WHERE adoption_id = ? ORDER BY generated_on DESC, id DESC LIMIT 1"
        ))
        .bind(adoption_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_contract).transpose()
    }

    pub async fn list_for_adoption(&self, adoption_id: i64) -> DatabaseResult<Vec<Contract>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_for_adoption_in(&mut conn, adoption_id).await
    }

    pub async fn list_for_adoption_in(
        conn: &mut SqliteConnection,
        adoption_id: i64,
    ) -> DatabaseResult<Vec<Contract>> {
        let rows = sqlx::query(&format!("{CONTRACT_SELECT} WHERE adoption_id = ? ORDER BY id ASC"))
            .bind(adoption_id)
            .fetch_all(&mut *conn)
            .await?;
        rows.iter().map(map_contract).collect()
    }

    pub async fn set_document_path_in(
        conn: &mut SqliteConnection,
        id: i64,
        path: &str,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE contracts SET document_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Record one party's signature. Signing twice keeps the first date.
    pub async fn sign(&self, id: i64, party: SignatoryParty, on: NaiveDate) -> DatabaseResult<Contract> {
        let sql = match party {
            SignatoryParty::Adopter => {
                "UPDATE contracts SET adopter_signed = 1, adopter_signed_on = COALESCE(adopter_signed_on, ?) WHERE id = ?"
            }
            SignatoryParty::Admin => {
                "UPDATE contracts SET admin_signed = 1, admin_signed_on = COALESCE(admin_signed_on, ?) WHERE id = ?"
            }
        };

        let result = sqlx::query(sql).bind(on).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("contract {id}")));
        }

        info!(contract_id = id, party = %party, "contract signed");
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("contract {id}")))
    }

    pub async fn delete_for_adoption_in(conn: &mut SqliteConnection, adoption_id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM contracts WHERE adoption_id = ?")
            .bind(adoption_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

fn map_contract(row: &SqliteRow) -> DatabaseResult<Contract> {
    Ok(Contract {
        id: row.try_get("id")?,
        adoption_id: row.try_get("adoption_id")?,
        adopter_id: row.try_get("adopter_id")?,
        generated_on: row.try_get("generated_on")?,
        document_path: row.try_get("document_path")?,
        adopter_signed: row.try_get("adopter_signed")?,
        adopter_signed_on: row.try_get("adopter_signed_on")?,
        admin_signed: row.try_get("admin_signed")?,
        admin_signed_on: row.try_get("admin_signed_on")?,
        accepts_follow_up: row.try_get("accepts_follow_up")?,
        care_commitment: row.try_get("care_commitment")?,
    })
}
