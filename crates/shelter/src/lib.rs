//! # Rescatando Shelter Crate
//!
//! Business logic for the shelter: the adoption-request and volunteer
//! workflows, adoptions and their contracts, animals, donations and user
//! administration.
//!
//! ## Architecture
//!
//! - **Workflow**: closed status machines, one transition table per process
//! - **Services**: transactional operations over the database repositories
//! - **Mailer** / **Contracts**: side effects that run after commit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rescatando_shelter::ShelterServices;
//!
//! let shelter = ShelterServices::new(pool, authenticator, mailer, renderer, &config);
//! let outcome = shelter.adoptions.approve(request_id, &staff).await?;
//! ```

pub mod contracts;
pub mod errors;
pub mod mailer;
pub mod services;
pub mod templates;
pub mod workflow;

use std::sync::Arc;

use rescatando_auth::Authenticator;
use rescatando_config::AppConfig;
use sqlx::SqlitePool;

pub use contracts::{ContractContext, ContractRenderer, DocumentError, TextContractRenderer};
pub use errors::{ShelterError, ShelterResult};
pub use mailer::{EmailMessage, MailError, Mailer, OutboxMailer};
pub use services::{
    AccountService, ActionOutcome, AdoptionService, AnimalService, ApprovedAdoption, Dashboard,
    DashboardService, DonationForm, DonationService, MyAdoptions, UserService, VolunteerService,
};
pub use workflow::{
    AdoptionAction, ApplicationAction, RequestAction, TransitionError, Workflow,
};

/// All shelter services sharing one pool, mailer and renderer.
#[derive(Clone)]
pub struct ShelterServices {
    pub accounts: AccountService,
    pub adoptions: AdoptionService,
    pub animals: AnimalService,
    pub dashboard: DashboardService,
    pub donations: DonationService,
    pub users: UserService,
    pub volunteers: VolunteerService,
}

impl ShelterServices {
    pub fn new(
        pool: SqlitePool,
        auth: Authenticator,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<dyn ContractRenderer>,
        config: &AppConfig,
    ) -> Self {
        Self {
            accounts: AccountService::new(
                auth,
                mailer.clone(),
                config.shelter.clone(),
                config.http.public_base_url.clone(),
            ),
            adoptions: AdoptionService::new(
                pool.clone(),
                mailer.clone(),
                renderer,
                config.shelter.clone(),
            ),
            animals: AnimalService::new(pool.clone()),
            dashboard: DashboardService::new(pool.clone()),
            donations: DonationService::new(pool.clone()),
            users: UserService::new(pool.clone()),
            volunteers: VolunteerService::new(pool, mailer, config.shelter.clone()),
        }
    }

    /// Production wiring: outbox mailer and text contracts from `config`.
    pub fn from_config(pool: SqlitePool, auth: Authenticator, config: &AppConfig) -> Self {
        let mailer = Arc::new(OutboxMailer::new(pool.clone(), config.mail.from_address.clone()));
        let renderer = Arc::new(TextContractRenderer::new(
            config.storage.contracts_dir.clone(),
            config.shelter.clone(),
        ));
        Self::new(pool, auth, mailer, renderer, config)
    }
}
