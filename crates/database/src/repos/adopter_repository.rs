//! Adopter profiles and their eligibility questionnaire.

use chrono::Utc;
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
    Row, Sqlite, SqliteConnection, SqlitePool,
};
use tracing::info;

use crate::entities::{Adopter, AdopterProfile};
use crate::types::{DatabaseError, DatabaseResult};

const PROFILE_COLUMNS: [&str; 29] = [
    "name",
    "phone",
    "national_id",
    "id_front_image",
    "id_back_image",
    "is_foreign",
    "has_permanent_residency",
    "address",
    "city",
    "district",
    "age",
    "adoption_reason",
    "has_had_pets",
    "current_pets_sterilized",
    "current_pets_vaccinated",
    "pet_food",
    "household_size",
    "household_agrees",
    "household_allergies",
    "allergy_plan",
    "housing_type",
    "has_safety_netting",
    "pets_allowed",
    "has_financial_means",
    "relocation_plan",
    "accepts_video_call",
    "accepts_follow_up",
    "accepts_photo_updates",
    "keeps_pet_indoors",
];

#[derive(Clone)]
pub struct AdopterRepository {
    pool: SqlitePool,
}

impl AdopterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Adopter>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<Adopter>> {
        let row = sqlx::query(&select_where("id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_adopter).transpose()
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Option<Adopter>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_user_id_in(&mut conn, user_id).await
    }

    pub async fn find_by_user_id_in(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> DatabaseResult<Option<Adopter>> {
        let row = sqlx::query(&select_where("user_id = ?"))
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_adopter).transpose()
    }

    /// Create the user's adopter profile, or refresh its questionnaire when
    /// one already exists.
    pub async fn upsert_for_user_in(
        conn: &mut SqliteConnection,
        user_id: i64,
        email: &str,
        profile: &AdopterProfile,
    ) -> DatabaseResult<Adopter> {
        if let Some(existing) = Self::find_by_user_id_in(conn, user_id).await? {
            let assignments = PROFILE_COLUMNS
                .iter()
                .map(|column| format!("{column} = ?"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!("UPDATE adopters SET {assignments} WHERE id = ?");

            bind_profile(sqlx::query(&sql), profile)
                .bind(existing.id)
                .execute(&mut *conn)
                .await?;

            info!(adopter_id = existing.id, user_id, "updated adopter questionnaire");

            return Self::find_by_id_in(conn, existing.id)
                .await?
                .ok_or_else(|| DatabaseError::NotFound(format!("adopter {}", existing.id)));
        }

        let placeholders = vec!["?"; PROFILE_COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO adopters (user_id, email, {}, created_at) VALUES (?, ?, {placeholders}, ?)",
            PROFILE_COLUMNS.join(", ")
        );

        let query = sqlx::query(&sql).bind(user_id).bind(email);
        let result = bind_profile(query, profile)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        let id = result.last_insert_rowid();
        info!(adopter_id = id, user_id, "created adopter profile");

        Self::find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("adopter {id}")))
    }
}

fn select_where(condition: &str) -> String {
    format!(
        "SELECT id, user_id, email, {}, created_at FROM adopters WHERE {condition}",
        PROFILE_COLUMNS.join(", ")
    )
}

fn bind_profile<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    profile: &'q AdopterProfile,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(&profile.name)
        .bind(&profile.phone)
        .bind(&profile.national_id)
        .bind(&profile.id_front_image)
        .bind(&profile.id_back_image)
        .bind(profile.is_foreign)
        .bind(profile.has_permanent_residency)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.district)
        .bind(profile.age)
        .bind(&profile.adoption_reason)
        .bind(profile.has_had_pets)
        .bind(&profile.current_pets_sterilized)
        .bind(&profile.current_pets_vaccinated)
        .bind(&profile.pet_food)
        .bind(profile.household_size)
        .bind(profile.household_agrees)
        .bind(profile.household_allergies)
        .bind(&profile.allergy_plan)
        .bind(&profile.housing_type)
        .bind(profile.has_safety_netting)
        .bind(profile.pets_allowed)
        .bind(profile.has_financial_means)
        .bind(&profile.relocation_plan)
        .bind(profile.accepts_video_call)
        .bind(profile.accepts_follow_up)
        .bind(profile.accepts_photo_updates)
        .bind(profile.keeps_pet_indoors)
}

fn map_adopter(row: &SqliteRow) -> DatabaseResult<Adopter> {
    let profile = AdopterProfile {
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        national_id: row.try_get("national_id")?,
        id_front_image: row.try_get("id_front_image")?,
        id_back_image: row.try_get("id_back_image")?,
        is_foreign: row.try_get("is_foreign")?,
        has_permanent_residency: row.try_get("has_permanent_residency")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        district: row.try_get("district")?,
        age: row.try_get("age")?,
        adoption_reason: row.try_get("adoption_reason")?,
        has_had_pets: row.try_get("has_had_pets")?,
        current_pets_sterilized: row.try_get("current_pets_sterilized")?,
        current_pets_vaccinated: row.try_get("current_pets_vaccinated")?,
        pet_food: row.try_get("pet_food")?,
        household_size: row.try_get("household_size")?,
        household_agrees: row.try_get("household_agrees")?,
        household_allergies: row.try_get("household_allergies")?,
        allergy_plan: row.try_get("allergy_plan")?,
        housing_type: row.try_get("housing_type")?,
        has_safety_netting: row.try_get("has_safety_netting")?,
        pets_allowed: row.try_get("pets_allowed")?,
        has_financial_means: row.try_get("has_financial_means")?,
        relocation_plan: row.try_get("relocation_plan")?,
        accepts_video_call: row.try_get("accepts_video_call")?,
        accepts_follow_up: row.try_get("accepts_follow_up")?,
        accepts_photo_updates: row.try_get("accepts_photo_updates")?,
        keeps_pet_indoors: row.try_get("keeps_pet_indoors")?,
    };

    Ok(Adopter {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        email: row.try_get("email")?,
        profile,
        created_at: row.try_get("created_at")?,
    })
}
