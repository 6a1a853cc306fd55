//! Adoption requests, adoptions and their contracts.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use rescatando_auth::validation::{
    required, sanitize_input, sanitize_optional, ADDRESS_MAX, NAME_MAX, PHONE_MAX, TEXT_MAX,
};
use rescatando_config::ShelterConfig;
use rescatando_database::{
    Adopter, AdopterProfile, AdopterRepository, Adoption, AdoptionRepository, AdoptionRequest,
    AdoptionRequestRepository, AdoptionRequestSummary, AdoptionSummary, Animal, AnimalRepository,
    Contract, ContractRepository, InterviewRepository, InterviewResult, InterviewSubject,
    NewAdoption, NewContract, NewInterviewRecord, RequestStatusChange, SignatoryParty, User,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::contracts::{ContractContext, ContractRenderer};
use crate::errors::{ShelterError, ShelterResult};
use crate::mailer::Mailer;
use crate::services::{notify, ActionOutcome};
use crate::templates;
use crate::workflow::{AdoptionAction, RequestAction, Workflow};

pub const CANCELLATION_REASON: &str = "Adoption cancelled by the administration";

/// Everything written by a successful approval.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ApprovedAdoption {
    pub request: AdoptionRequestSummary,
    pub adoption: Adoption,
    pub contract: Contract,
}

/// The signed-in user's side of the adoption process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct MyAdoptions {
    pub requests: Vec<AdoptionRequestSummary>,
    pub adoptions: Vec<AdoptionSummary>,
    pub contracts: Vec<Contract>,
}

#[derive(Clone)]
pub struct AdoptionService {
    pool: SqlitePool,
    requests: AdoptionRequestRepository,
    adoptions: AdoptionRepository,
    contracts: ContractRepository,
    adopters: AdopterRepository,
    mailer: Arc<dyn Mailer>,
    renderer: Arc<dyn ContractRenderer>,
    shelter: ShelterConfig,
}

impl AdoptionService {
    pub fn new(
        pool: SqlitePool,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<dyn ContractRenderer>,
        shelter: ShelterConfig,
    ) -> Self {
        Self {
            requests: AdoptionRequestRepository::new(pool.clone()),
            adoptions: AdoptionRepository::new(pool.clone()),
            contracts: ContractRepository::new(pool.clone()),
            adopters: AdopterRepository::new(pool.clone()),
            pool,
            mailer,
            renderer,
            shelter,
        }
    }

    /// File a request for an available animal, creating or refreshing the
    /// user's adopter questionnaire in the same transaction.
    pub async fn submit_request(
        &self,
        user: &User,
        animal_id: i64,
        profile: &AdopterProfile,
    ) -> ShelterResult<AdoptionRequest> {
        let profile = clean_profile(profile)?;

        let mut tx = self.pool.begin().await?;
        let animal = AnimalRepository::find_by_id_in(&mut *tx, animal_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("animal {animal_id}")))?;
        if !animal.available {
            return Err(ShelterError::conflict(format!("{} has already been adopted", animal.name)));
        }

        let adopter = AdopterRepository::upsert_for_user_in(&mut *tx, user.id, &user.email, &profile).await?;
        let request =
            AdoptionRequestRepository::create_in(&mut *tx, animal.id, adopter.id, Utc::now().date_naive())
                .await?;
        tx.commit().await?;

        Ok(request)
    }

    pub async fn list_requests(&self) -> ShelterResult<Vec<AdoptionRequestSummary>> {
        Ok(self.requests.list_summaries().await?)
    }

    pub async fn get_request(&self, id: i64) -> ShelterResult<AdoptionRequestSummary> {
        self.requests
            .find_summary(id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adoption request {id}")))
    }

    pub async fn schedule_interview(
        &self,
        id: i64,
        staff: &User,
        at: NaiveDateTime,
        meeting_link: Option<&str>,
    ) -> ShelterResult<ActionOutcome<AdoptionRequestSummary>> {
        let summary = self.get_request(id).await?;
        let from = summary.request.status;
        let next = from.apply(RequestAction::ScheduleInterview)?;

        let meeting_link = sanitize_optional(meeting_link, 255);
        self.requests
            .set_status(
                id,
                from,
                next,
                &RequestStatusChange {
                    interview_at: Some(at),
                    meeting_link: meeting_link.clone(),
                    processed_by: Some(staff.id),
                    ..Default::default()
                },
            )
            .await?;

        let summary = self.get_request(id).await?;
        let mut outcome = ActionOutcome::new(summary);
        let message = templates::interview_scheduled(
            &self.shelter,
            &outcome.value.adopter_email,
            &outcome.value.adopter_name,
            &outcome.value.animal_name,
            at,
            meeting_link.as_deref(),
        );
        notify(self.mailer.as_ref(), message, &mut outcome.warnings).await;
        Ok(outcome)
    }

    /// Close the interview of a request and keep a record of it. The record
    /// stays `pending` until the request is approved or rejected.
    pub async fn mark_interview_done(
        &self,
        id: i64,
        staff: &User,
        notes: Option<&str>,
    ) -> ShelterResult<AdoptionRequestSummary> {
        let summary = self.get_request(id).await?;
        let from = summary.request.status;
        let next = from.apply(RequestAction::MarkInterviewDone)?;
        let notes = sanitize_optional(notes, TEXT_MAX);

        let mut tx = self.pool.begin().await?;
        AdoptionRequestRepository::set_status_in(
            &mut *tx,
            id,
            from,
            next,
            &RequestStatusChange {
                interview_notes: notes.clone(),
                ..Default::default()
            },
        )
        .await?;
        InterviewRepository::create_in(
            &mut *tx,
            &NewInterviewRecord {
                subject: InterviewSubject::AdoptionRequest,
                subject_id: id,
                held_on: summary
                    .request
                    .interview_at
                    .map(|at| at.date())
                    .unwrap_or_else(|| Utc::now().date_naive()),
                observations: notes.unwrap_or_default(),
                result: InterviewResult::Pending,
                interviewer_id: Some(staff.id),
            },
        )
        .await?;
        tx.commit().await?;

        self.get_request(id).await
    }

    /// Approve a request: in one transaction the request is approved, the
    /// animal is taken off the catalogue and an adoption with its contract is
    /// created. The contract document and the email follow after commit.
    pub async fn approve(&self, id: i64, staff: &User) -> ShelterResult<ActionOutcome<ApprovedAdoption>> {
        let today = Utc::now().date_naive();
        let request = self
            .requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adoption request {id}")))?;
        let next = request.status.apply(RequestAction::Approve)?;

        // The guarded status write is the first statement so the transaction
        // holds the write lock before it reads the animal.
        let mut tx = self.pool.begin().await?;
        AdoptionRequestRepository::set_status_in(
            &mut *tx,
            id,
            request.status,
            next,
            &RequestStatusChange {
                approved_on: Some(today),
                processed_by: Some(staff.id),
                ..Default::default()
            },
        )
        .await?;
        InterviewRepository::settle_for_request_in(&mut *tx, id, InterviewResult::Approved).await?;

        let animal = AnimalRepository::find_by_id_in(&mut *tx, request.animal_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("animal {}", request.animal_id)))?;
        if AdoptionRepository::count_for_animal_in(&mut *tx, animal.id).await? > 0
            || AnimalRepository::mark_unavailable_in(&mut *tx, animal.id).await? == 0
        {
            return Err(ShelterError::conflict(format!("{} has already been adopted", animal.name)));
        }

        let adopter = AdopterRepository::find_by_id_in(&mut *tx, request.adopter_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adopter {}", request.adopter_id)))?;

        let adoption = AdoptionRepository::create_in(
            &mut *tx,
            &NewAdoption {
                animal_id: animal.id,
                adopter_id: adopter.id,
                request_id: Some(id),
                adopted_on: today,
                approved_by: Some(staff.id),
            },
        )
        .await?;

        let contract = ContractRepository::create_in(
            &mut *tx,
            &NewContract {
                adoption_id: adoption.id,
                adopter_id: adopter.id,
                generated_on: today,
                accepts_follow_up: adopter.profile.accepts_follow_up,
                care_commitment: format!("Care commitment for {}", animal.name),
            },
        )
        .await?;

        tx.commit().await?;
        info!(
            request_id = id,
            adoption_id = adoption.id,
            animal_id = animal.id,
            "approved adoption request"
        );

        let mut warnings = Vec::new();
        let (adoption, contract, contract_ready) =
            match self.attach_document(adoption.clone(), contract.clone(), &adopter, &animal).await {
                Ok((adoption, contract)) => (adoption, contract, true),
                Err(err) => {
                    warn!(adoption_id = adoption.id, error = %err, "contract document generation failed");
                    warnings.push(format!(
                        "the adoption was approved but its contract document could not be generated: {err}"
                    ));
                    (adoption, contract, false)
                }
            };

        let message = templates::adoption_approved(
            &self.shelter,
            &adopter.email,
            &adopter.profile.name,
            &animal.name,
            contract_ready,
        );
        notify(self.mailer.as_ref(), message, &mut warnings).await;

        Ok(ActionOutcome {
            value: ApprovedAdoption {
                request: self.get_request(id).await?,
                adoption,
                contract,
            },
            warnings,
        })
    }

    pub async fn reject(
        &self,
        id: i64,
        staff: &User,
        reason: Option<&str>,
    ) -> ShelterResult<ActionOutcome<AdoptionRequestSummary>> {
        let summary = self.get_request(id).await?;
        let from = summary.request.status;
        let next = from.apply(RequestAction::Reject)?;

        let reason = sanitize_optional(reason, TEXT_MAX);
        let mut tx = self.pool.begin().await?;
        AdoptionRequestRepository::set_status_in(
            &mut *tx,
            id,
            from,
            next,
            &RequestStatusChange {
                rejection_reason: reason.clone(),
                processed_by: Some(staff.id),
                ..Default::default()
            },
        )
        .await?;
        InterviewRepository::settle_for_request_in(&mut *tx, id, InterviewResult::Rejected).await?;
        tx.commit().await?;
        info!(request_id = id, "rejected adoption request");

        let mut outcome = ActionOutcome::new(self.get_request(id).await?);
        let message = templates::adoption_rejected(
            &self.shelter,
            &outcome.value.adopter_email,
            &outcome.value.adopter_name,
            &outcome.value.animal_name,
            reason.as_deref(),
        );
        notify(self.mailer.as_ref(), message, &mut outcome.warnings).await;
        Ok(outcome)
    }

    /// Remove a request. Returns whether the animal is available afterwards,
    /// which holds only when no adoption references it.
    pub async fn delete_request(&self, id: i64) -> ShelterResult<bool> {
        let mut tx = self.pool.begin().await?;
        let request = AdoptionRequestRepository::find_by_id_in(&mut *tx, id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adoption request {id}")))?;

        AdoptionRequestRepository::delete_in(&mut *tx, id).await?;
        AnimalRepository::restore_availability_in(&mut *tx, request.animal_id).await?;
        let animal = AnimalRepository::find_by_id_in(&mut *tx, request.animal_id).await?;
        tx.commit().await?;

        Ok(animal.map(|animal| animal.available).unwrap_or(false))
    }

    pub async fn list_adoptions(&self) -> ShelterResult<Vec<AdoptionSummary>> {
        Ok(self.adoptions.list_summaries().await?)
    }

    pub async fn get_adoption(&self, id: i64) -> ShelterResult<AdoptionSummary> {
        self.adoptions
            .find_summary(id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adoption {id}")))
    }

    /// Render the contract of an adoption still `in_progress`, creating the
    /// contract row first when none exists.
    pub async fn generate_contract(&self, adoption_id: i64) -> ShelterResult<(Adoption, Contract)> {
        let adoption = self.find_adoption(adoption_id).await?;
        adoption.status.apply(AdoptionAction::GenerateContract)?;

        let adopter = self
            .adopters
            .find_by_id(adoption.adopter_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adopter {}", adoption.adopter_id)))?;
        let animal = AnimalRepository::new(self.pool.clone())
            .find_by_id(adoption.animal_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("animal {}", adoption.animal_id)))?;

        let contract = match self.contracts.latest_for_adoption(adoption_id).await? {
            Some(contract) => contract,
            None => {
                let mut conn = self.pool.acquire().await?;
                ContractRepository::create_in(
                    &mut conn,
                    &NewContract {
                        adoption_id,
                        adopter_id: adopter.id,
                        generated_on: Utc::now().date_naive(),
                        accepts_follow_up: adopter.profile.accepts_follow_up,
                        care_commitment: format!("Care commitment for {}", animal.name),
                    },
                )
                .await?
            }
        };

        self.attach_document(adoption, contract, &adopter, &animal).await
    }

    pub async fn complete(&self, adoption_id: i64) -> ShelterResult<Adoption> {
        let adoption = self.find_adoption(adoption_id).await?;
        adoption.status.apply(AdoptionAction::Complete)?;

        self.adoptions
            .mark_completed(adoption_id, Utc::now().date_naive())
            .await?;
        self.find_adoption(adoption_id).await
    }

    /// Undo an adoption: the originating request is cancelled, contracts
    /// are dropped and the animal returns to the catalogue. Stored contract
    /// documents are removed afterwards on a best-effort basis.
    pub async fn delete_adoption(&self, adoption_id: i64) -> ShelterResult<ActionOutcome<()>> {
        let mut tx = self.pool.begin().await?;
        let adoption = AdoptionRepository::find_by_id_in(&mut *tx, adoption_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adoption {adoption_id}")))?;

        if let Some(request_id) = adoption.request_id {
            if let Some(request) = AdoptionRequestRepository::find_by_id_in(&mut *tx, request_id).await? {
                match request.status.apply(RequestAction::CancelAdoption) {
                    Ok(next) => {
                        AdoptionRequestRepository::set_status_in(
                            &mut *tx,
                            request_id,
                            request.status,
                            next,
                            &RequestStatusChange {
                                rejection_reason: Some(CANCELLATION_REASON.to_string()),
                                ..Default::default()
                            },
                        )
                        .await?;
                    }
                    Err(err) => warn!(request_id, error = %err, "origin request left unchanged"),
                }
            }
        }

        let contracts = ContractRepository::list_for_adoption_in(&mut *tx, adoption_id).await?;
        ContractRepository::delete_for_adoption_in(&mut *tx, adoption_id).await?;
        AdoptionRepository::delete_in(&mut *tx, adoption_id).await?;
        AnimalRepository::restore_availability_in(&mut *tx, adoption.animal_id).await?;
        tx.commit().await?;

        info!(adoption_id, animal_id = adoption.animal_id, "deleted adoption");

        let mut outcome = ActionOutcome::new(());
        for path in contracts.iter().filter_map(|c| c.document_path.as_deref()) {
            if let Err(err) = self.renderer.discard(path).await {
                warn!(path, error = %err, "could not remove contract document");
                outcome.warn(format!("contract document {path} could not be removed: {err}"));
            }
        }
        Ok(outcome)
    }

    pub async fn contracts_for_adoption(&self, adoption_id: i64) -> ShelterResult<Vec<Contract>> {
        self.find_adoption(adoption_id).await?;
        Ok(self.contracts.list_for_adoption(adoption_id).await?)
    }

    pub async fn sign_as_admin(&self, contract_id: i64) -> ShelterResult<Contract> {
        Ok(self
            .contracts
            .sign(contract_id, SignatoryParty::Admin, Utc::now().date_naive())
            .await?)
    }

    /// Adopter signature; only the adopter named on the contract may sign.
    pub async fn sign_as_adopter(&self, user: &User, contract_id: i64) -> ShelterResult<Contract> {
        let contract = self
            .contracts
            .find_by_id(contract_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("contract {contract_id}")))?;

        let owns = self
            .adopters
            .find_by_user_id(user.id)
            .await?
            .is_some_and(|adopter| adopter.id == contract.adopter_id);
        if !owns {
            return Err(ShelterError::Forbidden(
                "this contract belongs to another adopter".to_string(),
            ));
        }

        Ok(self
            .contracts
            .sign(contract_id, SignatoryParty::Adopter, Utc::now().date_naive())
            .await?)
    }

    pub async fn my_adoptions(&self, user: &User) -> ShelterResult<MyAdoptions> {
        let Some(adopter) = self.adopters.find_by_user_id(user.id).await? else {
            return Ok(MyAdoptions::default());
        };

        let requests = self.requests.list_summaries_for_adopter(adopter.id).await?;
        let adoptions = self.adoptions.list_summaries_for_adopter(adopter.id).await?;
        let mut contracts = Vec::new();
        for summary in &adoptions {
            contracts.extend(self.contracts.list_for_adoption(summary.adoption.id).await?);
        }

        Ok(MyAdoptions {
            requests,
            adoptions,
            contracts,
        })
    }

    async fn find_adoption(&self, id: i64) -> ShelterResult<Adoption> {
        self.adoptions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("adoption {id}")))
    }

    /// Render the document, then store its path and advance the adoption.
    async fn attach_document(
        &self,
        adoption: Adoption,
        contract: Contract,
        adopter: &Adopter,
        animal: &Animal,
    ) -> ShelterResult<(Adoption, Contract)> {
        let next = adoption.status.apply(AdoptionAction::GenerateContract)?;
        let path = self
            .renderer
            .render(&ContractContext {
                contract: contract.clone(),
                adopter: adopter.clone(),
                animal: animal.clone(),
            })
            .await?;

        let today = Utc::now().date_naive();
        let mut tx = self.pool.begin().await?;
        ContractRepository::set_document_path_in(&mut *tx, contract.id, &path).await?;
        AdoptionRepository::mark_contract_generated_in(&mut *tx, adoption.id, today).await?;
        let contract = ContractRepository::find_by_id_in(&mut *tx, contract.id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("contract {}", contract.id)))?;
        tx.commit().await?;

        Ok((
            Adoption {
                status: next,
                contract_on: Some(today),
                ..adoption
            },
            contract,
        ))
    }
}

fn clean_profile(profile: &AdopterProfile) -> ShelterResult<AdopterProfile> {
    if profile.age < 18 {
        return Err(ShelterError::validation("adopters must be at least 18 years old"));
    }
    if profile.household_size < 1 {
        return Err(ShelterError::validation("household_size must be at least 1"));
    }

    Ok(AdopterProfile {
        name: required("name", &profile.name, NAME_MAX)?,
        phone: required("phone", &profile.phone, PHONE_MAX)?,
        national_id: required("national_id", &profile.national_id, 12)?,
        id_front_image: sanitize_optional(profile.id_front_image.as_deref(), 255),
        id_back_image: sanitize_optional(profile.id_back_image.as_deref(), 255),
        address: required("address", &profile.address, ADDRESS_MAX)?,
        city: sanitize_input(&profile.city, NAME_MAX),
        district: sanitize_input(&profile.district, NAME_MAX),
        adoption_reason: sanitize_input(&profile.adoption_reason, TEXT_MAX),
        current_pets_sterilized: sanitize_input(&profile.current_pets_sterilized, TEXT_MAX),
        current_pets_vaccinated: sanitize_input(&profile.current_pets_vaccinated, TEXT_MAX),
        pet_food: sanitize_input(&profile.pet_food, TEXT_MAX),
        allergy_plan: sanitize_input(&profile.allergy_plan, TEXT_MAX),
        housing_type: sanitize_input(&profile.housing_type, 50),
        relocation_plan: sanitize_input(&profile.relocation_plan, TEXT_MAX),
        ..profile.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_requires_identity_and_adult_age() {
        let valid = AdopterProfile {
            name: " Ana ".into(),
            phone: "+56911112222".into(),
            national_id: "12.345.678-9".into(),
            address: "Los Aromos 12".into(),
            ..AdopterProfile::default()
        };
        assert_eq!(clean_profile(&valid).unwrap().name, "Ana");

        let minor = AdopterProfile { age: 17, ..valid.clone() };
        assert!(matches!(clean_profile(&minor), Err(ShelterError::Validation(_))));

        let anonymous = AdopterProfile { name: String::new(), ..valid };
        assert!(matches!(clean_profile(&anonymous), Err(ShelterError::Validation(_))));
    }
}
