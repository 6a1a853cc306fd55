//! Animal, medical record and foster home management.

use chrono::Utc;
use rescatando_auth::validation::{required, sanitize_input, sanitize_optional, NAME_MAX, TEXT_MAX};
use rescatando_database::{
    Animal, AnimalInput, AnimalRepository, AnimalWithRecord, FosterHome, FosterHomeRepository,
    MedicalRecord, MedicalRecordInput, NewFosterHome, UserRepository, UserRole, Volunteer,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::errors::{ShelterError, ShelterResult};

const DEFAULT_HOME_ADDRESS: &str = "Central shelter";
const DEFAULT_HOME_CAPACITY: i64 = 50;

#[derive(Clone)]
pub struct AnimalService {
    pool: SqlitePool,
    animals: AnimalRepository,
    homes: FosterHomeRepository,
}

impl AnimalService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            animals: AnimalRepository::new(pool.clone()),
            homes: FosterHomeRepository::new(pool.clone()),
            pool,
        }
    }

    /// Public catalogue: animals still waiting for a family.
    pub async fn list_available(&self) -> ShelterResult<Vec<AnimalWithRecord>> {
        Ok(self.animals.list_available_with_records().await?)
    }

    pub async fn list_all(&self) -> ShelterResult<Vec<Animal>> {
        Ok(self.animals.list_by_name().await?)
    }

    pub async fn get(&self, id: i64) -> ShelterResult<Animal> {
        self.animals
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("animal {id}")))
    }

    pub async fn get_with_record(&self, id: i64) -> ShelterResult<AnimalWithRecord> {
        let animal = self.get(id).await?;
        let medical_record = self.animals.medical_record(id).await?;
        Ok(AnimalWithRecord {
            animal,
            medical_record,
        })
    }

    /// Register an animal together with its medical record.
    pub async fn create(
        &self,
        input: &AnimalInput,
        record: &MedicalRecordInput,
    ) -> ShelterResult<AnimalWithRecord> {
        let input = clean_animal(input)?;
        let record = clean_record(record);

        let mut tx = self.pool.begin().await?;
        let home_id = resolve_foster_home(&mut *tx, input.foster_home_id).await?;
        let animal = AnimalRepository::create_in(&mut *tx, &input, home_id).await?;
        let medical_record = AnimalRepository::create_medical_record_in(&mut *tx, animal.id, &record).await?;
        tx.commit().await?;

        Ok(AnimalWithRecord {
            animal,
            medical_record: Some(medical_record),
        })
    }

    /// Update the editable fields. Availability is owned by the adoption
    /// workflow and is never touched here.
    pub async fn update(&self, id: i64, input: &AnimalInput) -> ShelterResult<Animal> {
        let input = clean_animal(input)?;
        if let Some(home_id) = input.foster_home_id {
            let mut conn = self.pool.acquire().await?;
            FosterHomeRepository::find_by_id_in(&mut conn, home_id)
                .await?
                .ok_or_else(|| ShelterError::not_found(format!("foster home {home_id}")))?;
        }
        Ok(self.animals.update(id, &input).await?)
    }

    pub async fn delete(&self, id: i64) -> ShelterResult<()> {
        Ok(self.animals.delete(id).await?)
    }

    pub async fn medical_record(&self, animal_id: i64) -> ShelterResult<MedicalRecord> {
        self.animals
            .medical_record(animal_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("medical record for animal {animal_id}")))
    }

    pub async fn update_medical_record(
        &self,
        animal_id: i64,
        input: &MedicalRecordInput,
    ) -> ShelterResult<MedicalRecord> {
        self.get(animal_id).await?;
        Ok(self
            .animals
            .upsert_medical_record(animal_id, &clean_record(input))
            .await?)
    }

    pub async fn list_foster_homes(&self) -> ShelterResult<Vec<FosterHome>> {
        Ok(self.homes.list().await?)
    }

    pub async fn create_foster_home(&self, home: &NewFosterHome) -> ShelterResult<FosterHome> {
        if home.capacity < 1 {
            return Err(ShelterError::validation("capacity must be at least 1"));
        }
        let home = NewFosterHome {
            volunteer_id: home.volunteer_id,
            address: required("address", &home.address, 200)?,
            description: sanitize_input(&home.description, TEXT_MAX),
            capacity: home.capacity,
            status: required("status", &home.status, 50)?,
        };
        Ok(self.homes.create(&home).await?)
    }

    pub async fn list_volunteers(&self) -> ShelterResult<Vec<Volunteer>> {
        Ok(self.homes.list_volunteers().await?)
    }

    pub async fn create_volunteer(&self, user_public_id: &str, volunteer_type: &str) -> ShelterResult<Volunteer> {
        let users = UserRepository::new(self.pool.clone());
        let user = users
            .find_by_public_id(user_public_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("user {user_public_id}")))?;
        let volunteer_type = required("volunteer_type", volunteer_type, 50)?;
        Ok(self
            .homes
            .create_volunteer(user.id, &volunteer_type, Utc::now().date_naive())
            .await?)
    }
}

/// Pick the home for a new animal: the requested one, else the first
/// existing home, else a default home created on the fly.
async fn resolve_foster_home(conn: &mut SqliteConnection, requested: Option<i64>) -> ShelterResult<i64> {
    if let Some(id) = requested {
        FosterHomeRepository::find_by_id_in(&mut *conn, id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("foster home {id}")))?;
        return Ok(id);
    }

    if let Some(home) = FosterHomeRepository::first_in(&mut *conn).await? {
        return Ok(home.id);
    }

    let volunteer = match FosterHomeRepository::first_volunteer_in(&mut *conn).await? {
        Some(volunteer) => volunteer,
        None => {
            let admin = UserRepository::first_with_role_in(&mut *conn, UserRole::Admin)
                .await?
                .ok_or_else(|| {
                    ShelterError::conflict("an administrator account is required before registering animals")
                })?;
            FosterHomeRepository::create_volunteer_in(&mut *conn, admin.id, "admin", Utc::now().date_naive())
                .await?
        }
    };

    let home = FosterHomeRepository::create_in(
        &mut *conn,
        &NewFosterHome {
            volunteer_id: volunteer.id,
            address: DEFAULT_HOME_ADDRESS.to_string(),
            description: "Default home for newly registered animals".to_string(),
            capacity: DEFAULT_HOME_CAPACITY,
            status: "active".to_string(),
        },
    )
    .await?;

    info!(foster_home_id = home.id, volunteer_id = volunteer.id, "created default foster home");
    Ok(home.id)
}

fn clean_animal(input: &AnimalInput) -> ShelterResult<AnimalInput> {
    if input.age < 0 {
        return Err(ShelterError::validation("age cannot be negative"));
    }

    Ok(AnimalInput {
        name: required("name", &input.name, NAME_MAX)?,
        species: required("species", &input.species, 50)?,
        age: input.age,
        sex: required("sex", &input.sex, 20)?,
        health_status: required("health_status", &input.health_status, 100)?,
        description: sanitize_input(&input.description, TEXT_MAX),
        photo: sanitize_optional(input.photo.as_deref(), 255),
        foster_home_id: input.foster_home_id,
    })
}

fn clean_record(input: &MedicalRecordInput) -> MedicalRecordInput {
    let health_status = sanitize_input(&input.health_status, 100);
    MedicalRecordInput {
        health_status: if health_status.is_empty() {
            MedicalRecordInput::default().health_status
        } else {
            health_status
        },
        last_vaccination: sanitize_optional(input.last_vaccination.as_deref(), 200),
        notes: sanitize_optional(input.notes.as_deref(), TEXT_MAX),
        ..input.clone()
    }
}
