//! Rescatando Database Crate
//!
//! Connection management, embedded migrations, entities and repositories for
//! the shelter backend.

use rescatando_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::{
    AdopterRepository, AdoptionRepository, AdoptionRequestRepository, AnimalRepository,
    ContractRepository, DonationRepository, FosterHomeRepository, InterviewRepository,
    NewAdoption, NewContract, OutboundEmailRepository, PasswordResetRepository,
    RequestStatusChange, UserDependents, UserRepository, VolunteerApplicationRepository,
};

pub use entities::{
    Adopter, AdopterProfile, Adoption, AdoptionRequest, AdoptionRequestSummary, AdoptionStatus,
    AdoptionSummary, Animal, AnimalInput, AnimalWithRecord, ApplicationStatus, Avatar, Contract,
    Donation, EmailStatus, FosterHome, InterviewRecord, InterviewResult, InterviewSubject,
    MedicalRecord, MedicalRecordInput, NewDonation, NewFosterHome, NewInterviewRecord, NewUser,
    NewVolunteerApplication, OutboundEmail, PasswordResetToken, RequestStatus, SignatoryParty,
    User, UserProfileUpdate, UserRole, Volunteer, VolunteerApplication, VolunteerTeam,
};

pub use types::{DatabaseError, DatabaseResult, UnknownVariant};

/// Connect and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}
