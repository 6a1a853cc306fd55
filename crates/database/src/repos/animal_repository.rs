//! Animal and medical record persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::{Animal, AnimalInput, AnimalWithRecord, MedicalRecord, MedicalRecordInput};
use crate::types::{DatabaseError, DatabaseResult};

const ANIMAL_SELECT: &str = "SELECT id, name, species, age, sex, health_status, description, photo, available, foster_home_id, created_at FROM animals";

const RECORD_SELECT: &str = "SELECT id, animal_id, sterilized, sterilized_on, vaccines_up_to_date, last_vaccination, last_checkup, next_checkup, health_status, notes FROM medical_records";

#[derive(Clone)]
pub struct AnimalRepository {
    pool: SqlitePool,
}

impl AnimalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_in(
        conn: &mut SqliteConnection,
        input: &AnimalInput,
        foster_home_id: i64,
    ) -> DatabaseResult<Animal> {
        let result = sqlx::query(
            "INSERT INTO animals (name, species, age, sex, health_status, description, photo, available, foster_home_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.species)
        .bind(input.age)
        .bind(&input.sex)
        .bind(&input.health_status)
        .bind(&input.description)
        .bind(&input.photo)
        .bind(foster_home_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!(animal_id = id, name = %input.name, foster_home_id, "registered animal");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("animal {id}")))
    }

    pub async fn create_medical_record_in(
        conn: &mut SqliteConnection,
        animal_id: i64,
        input: &MedicalRecordInput,
    ) -> DatabaseResult<MedicalRecord> {
        sqlx::query(
            "INSERT INTO medical_records (animal_id, sterilized, sterilized_on, vaccines_up_to_date, last_vaccination, last_checkup, next_checkup, health_status, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(animal_id)
        .bind(input.sterilized)
        .bind(input.sterilized_on)
        .bind(input.vaccines_up_to_date)
        .bind(&input.last_vaccination)
        .bind(input.last_checkup)
        .bind(input.next_checkup)
        .bind(&input.health_status)
        .bind(&input.notes)
        .execute(&mut *conn)
        .await?;

        Self::medical_record_in(conn, animal_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("medical record for animal {animal_id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Animal>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<Animal>> {
        let row = sqlx::query(&format!("{ANIMAL_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_animal).transpose()
    }

    pub async fn list_by_name(&self) -> DatabaseResult<Vec<Animal>> {
        let rows = sqlx::query(&format!("{ANIMAL_SELECT} ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_animal).collect()
    }

    /// Animals open for adoption, each with its medical record when present.
    pub async fn list_available_with_records(&self) -> DatabaseResult<Vec<AnimalWithRecord>> {
        let rows = sqlx::query(&format!("{ANIMAL_SELECT} WHERE available = 1 ORDER BY created_at DESC, id DESC"))
            .fetch_all(&self.pool)
            .await?;

        let mut animals = Vec::with_capacity(rows.len());
        for row in &rows {
            let animal = map_animal(row)?;
            let medical_record = self.medical_record(animal.id).await?;
            animals.push(AnimalWithRecord {
                animal,
                medical_record,
            });
        }
        Ok(animals)
    }

    pub async fn update(&self, id: i64, input: &AnimalInput) -> DatabaseResult<Animal> {
        let result = sqlx::query(
            "UPDATE animals
             SET name = ?, species = ?, age = ?, sex = ?, health_status = ?, description = ?, photo = ?,
                 foster_home_id = COALESCE(?, foster_home_id)
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.species)
        .bind(input.age)
        .bind(&input.sex)
        .bind(&input.health_status)
        .bind(&input.description)
        .bind(&input.photo)
        .bind(input.foster_home_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("animal {id}")));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("animal {id}")))
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("animal {id}")));
        }
        info!(animal_id = id, "deleted animal");
        Ok(())
    }

    /// Flip an available animal to unavailable. Returns the affected row
    /// count, which is zero when the animal was already unavailable.
    pub async fn mark_unavailable_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("UPDATE animals SET available = 0 WHERE id = ? AND available = 1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Make the animal available again unless an adoption still references it.
    pub async fn restore_availability_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "UPDATE animals SET available = 1
             WHERE id = ?1 AND NOT EXISTS (SELECT 1 FROM adoptions WHERE animal_id = ?1)",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn medical_record(&self, animal_id: i64) -> DatabaseResult<Option<MedicalRecord>> {
        let mut conn = self.pool.acquire().await?;
        Self::medical_record_in(&mut conn, animal_id).await
    }

    pub async fn medical_record_in(
        conn: &mut SqliteConnection,
        animal_id: i64,
    ) -> DatabaseResult<Option<MedicalRecord>> {
        let row = sqlx::query(&format!("{RECORD_SELECT} WHERE animal_id = ?"))
            .bind(animal_id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_record).transpose()
    }

    /// Overwrite the animal's medical record, creating it when missing.
    pub async fn upsert_medical_record(
        &self,
        animal_id: i64,
        input: &MedicalRecordInput,
    ) -> DatabaseResult<MedicalRecord> {
        sqlx::query(
            "INSERT INTO medical_records (animal_id, sterilized, sterilized_on, vaccines_up_to_date, last_vaccination, last_checkup, next_checkup, health_status, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(animal_id) DO UPDATE SET
                sterilized = excluded.sterilized,
                sterilized_on = excluded.sterilized_on,
                vaccines_up_to_date = excluded.vaccines_up_to_date,
                last_vaccination = excluded.last_vaccination,
                last_checkup = excluded.last_checkup,
                next_checkup = excluded.next_checkup,
                health_status = excluded.health_status,
                notes = excluded.notes",
        )
        .bind(animal_id)
        .bind(input.sterilized)
        .bind(input.sterilized_on)
        .bind(input.vaccines_up_to_date)
        .bind(&input.last_vaccination)
        .bind(input.last_checkup)
        .bind(input.next_checkup)
        .bind(&input.health_status)
        .bind(&input.notes)
        .execute(&self.pool)
        .await?;

        info!(animal_id, "updated medical record");

        self.medical_record(animal_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("medical record for animal {animal_id}")))
    }
}

fn map_animal(row: &SqliteRow) -> DatabaseResult<Animal> {
    Ok(Animal {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        species: row.try_get("species")?,
        age: row.try_get("age")?,
        sex: row.try_get("sex")?,
        health_status: row.try_get("health_status")?,
        description: row.try_get("description")?,
        photo: row.try_get("photo")?,
        available: row.try_get("available")?,
        foster_home_id: row.try_get("foster_home_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_record(row: &SqliteRow) -> DatabaseResult<MedicalRecord> {
    Ok(MedicalRecord {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        sterilized: row.try_get("sterilized")?,
        sterilized_on: row.try_get("sterilized_on")?,
        vaccines_up_to_date: row.try_get("vaccines_up_to_date")?,
        last_vaccination: row.try_get("last_vaccination")?,
        last_checkup: row.try_get("last_checkup")?,
        next_checkup: row.try_get("next_checkup")?,
        health_status: row.try_get("health_status")?,
        notes: row.try_get("notes")?,
    })
}
