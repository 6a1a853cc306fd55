use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rescatando_auth::{Authenticator, Registration};
use rescatando_config::{AppConfig, AuthConfig, DatabaseConfig};
use rescatando_database::{
    initialize_database, AnimalInput, ApplicationStatus, Avatar, EmailStatus, MedicalRecordInput,
    NewVolunteerApplication, OutboundEmailRepository, User, UserRole, VolunteerTeam,
};
use rescatando_shelter::{
    DonationForm, OutboxMailer, ShelterError, ShelterServices, TextContractRenderer,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

struct TestContext {
    pool: SqlitePool,
    auth: Authenticator,
    shelter: ShelterServices,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = initialize_database(&DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("shelter.db").display()),
            max_connections: 4,
        })
        .await
        .unwrap();

        let config = AppConfig::default();
        let auth = Authenticator::new(pool.clone(), AuthConfig::default());
        let shelter = ShelterServices::new(
            pool.clone(),
            auth.clone(),
            Arc::new(OutboxMailer::new(pool.clone(), "no-reply@rescatando.org")),
            Arc::new(TextContractRenderer::new(
                temp_dir.path().join("contracts"),
                config.shelter.clone(),
            )),
            &config,
        );

        Self {
            pool,
            auth,
            shelter,
            _temp_dir: temp_dir,
        }
    }

    async fn admin(&self) -> User {
        self.auth
            .ensure_admin("admin", "Administrador", "admin@rescatando.com", "admin123")
            .await
            .unwrap()
            .unwrap()
    }

    async fn user(&self, account: &str) -> User {
        self.auth
            .register(&Registration {
                name: format!("User {account}"),
                account: account.into(),
                email: format!("{account}@example.cl"),
                password: "secreto".into(),
                password_confirmation: "secreto".into(),
                phone: None,
                address: None,
                avatar: Avatar::Dog,
            })
            .await
            .unwrap()
    }
}

fn animal(name: &str) -> AnimalInput {
    AnimalInput {
        name: name.into(),
        species: "Cat".into(),
        age: 2,
        sex: "Male".into(),
        health_status: "Healthy".into(),
        description: String::new(),
        photo: None,
        foster_home_id: None,
    }
}

#[tokio::test]
async fn animals_need_an_admin_for_the_default_home() {
    let ctx = TestContext::new().await;

    let error = ctx
        .shelter
        .animals
        .create(&animal("Milo"), &MedicalRecordInput::default())
        .await
        .unwrap_err();
    assert!(matches!(error, ShelterError::Conflict(_)));

    ctx.admin().await;
    let created = ctx
        .shelter
        .animals
        .create(&animal("Milo"), &MedicalRecordInput::default())
        .await
        .unwrap();
    assert!(created.animal.available);

    let homes = ctx.shelter.animals.list_foster_homes().await.unwrap();
    assert_eq!(homes.len(), 1);
    assert_eq!(homes[0].address, "Central shelter");
    assert_eq!(homes[0].capacity, 50);

    let second = ctx
        .shelter
        .animals
        .create(&animal("Nala"), &MedicalRecordInput::default())
        .await
        .unwrap();
    assert_eq!(second.animal.foster_home_id, homes[0].id);
    assert_eq!(ctx.shelter.animals.list_foster_homes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn medical_records_are_created_and_updated() {
    let ctx = TestContext::new().await;
    ctx.admin().await;
    let created = ctx
        .shelter
        .animals
        .create(&animal("Milo"), &MedicalRecordInput::default())
        .await
        .unwrap();
    let id = created.animal.id;

    let record = ctx.shelter.animals.medical_record(id).await.unwrap();
    assert!(record.vaccines_up_to_date);
    assert_eq!(record.health_status, "Good");

    let updated = ctx
        .shelter
        .animals
        .update_medical_record(
            id,
            &MedicalRecordInput {
                sterilized: true,
                sterilized_on: NaiveDate::from_ymd_opt(2025, 1, 10),
                notes: Some("Dewormed".into()),
                ..MedicalRecordInput::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.sterilized);
    assert_eq!(updated.notes.as_deref(), Some("Dewormed"));

    assert!(matches!(
        ctx.shelter.animals.medical_record(id + 100).await,
        Err(ShelterError::NotFound(_))
    ));
}

#[tokio::test]
async fn animal_update_never_touches_availability() {
    let ctx = TestContext::new().await;
    ctx.admin().await;
    let id = ctx
        .shelter
        .animals
        .create(&animal("Milo"), &MedicalRecordInput::default())
        .await
        .unwrap()
        .animal
        .id;

    sqlx::query("UPDATE animals SET available = 0 WHERE id = ?")
        .bind(id)
        .execute(&ctx.pool)
        .await
        .unwrap();

    let updated = ctx
        .shelter
        .animals
        .update(id, &AnimalInput { age: 4, ..animal("Milo") })
        .await
        .unwrap();
    assert_eq!(updated.age, 4);
    assert!(!updated.available);
}

#[tokio::test]
async fn volunteer_applications_follow_their_workflow() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let applicant = ctx.user("pedro").await;

    let application = ctx
        .shelter
        .volunteers
        .submit(
            &NewVolunteerApplication {
                full_name: "Pedro Soto".into(),
                email: "pedro@example.cl".into(),
                phone: "+56933334444".into(),
                address: "Providencia".into(),
                instagram: Some("@pedro".into()),
                team: VolunteerTeam::Rescue,
                experience: String::new(),
                motivation: "I want to help".into(),
                additional_info: None,
            },
            Some(&applicant),
        )
        .await
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.applicant_user_id, Some(applicant.id));

    let at = Utc::now().naive_utc();
    let scheduled = ctx
        .shelter
        .volunteers
        .schedule_interview(application.id, &admin, at)
        .await
        .unwrap();
    assert_eq!(scheduled.value.status, ApplicationStatus::InterviewScheduled);

    let approved = ctx
        .shelter
        .volunteers
        .approve(application.id, &admin, Some("Weekend rescues"))
        .await
        .unwrap();
    assert!(approved.warnings.is_empty());
    assert_eq!(approved.value.status, ApplicationStatus::Approved);
    assert_eq!(approved.value.admin_notes.as_deref(), Some("Weekend rescues"));
    assert_eq!(approved.value.processed_by, Some(admin.id));

    let error = ctx
        .shelter
        .volunteers
        .reject(application.id, &admin, None)
        .await
        .unwrap_err();
    assert!(matches!(error, ShelterError::InvalidTransition(_)));

    let outbox = OutboundEmailRepository::new(ctx.pool.clone())
        .list_for_recipient("pedro@example.cl")
        .await
        .unwrap();
    assert_eq!(outbox.len(), 2);
    assert!(outbox.iter().all(|email| email.status == EmailStatus::Queued));
}

#[tokio::test]
async fn volunteer_application_requires_contact_details() {
    let ctx = TestContext::new().await;

    let error = ctx
        .shelter
        .volunteers
        .submit(
            &NewVolunteerApplication {
                full_name: "Pedro".into(),
                email: "pedro-at-example".into(),
                phone: "1".into(),
                address: "x".into(),
                instagram: None,
                team: VolunteerTeam::Design,
                experience: String::new(),
                motivation: "help".into(),
                additional_info: None,
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(error, ShelterError::Validation(_)));
}

#[tokio::test]
async fn donations_name_the_donor() {
    let ctx = TestContext::new().await;
    let donor = ctx.user("carla").await;

    let anonymous = ctx
        .shelter
        .donations
        .donate(&DonationForm { receipt: "receipts/1.png".into(), ..DonationForm::default() }, None)
        .await;
    assert!(matches!(anonymous, Err(ShelterError::Validation(_))));

    let signed_in = ctx
        .shelter
        .donations
        .donate(
            &DonationForm {
                amount_cents: Some(500_000),
                receipt: "receipts/2.png".into(),
                ..DonationForm::default()
            },
            Some(&donor),
        )
        .await
        .unwrap();
    assert_eq!(signed_in.donor_name, "@carla");
    assert_eq!(signed_in.donated_on, Utc::now().date_naive());

    let dated = ctx
        .shelter
        .donations
        .donate(
            &DonationForm {
                donor_name: Some("María".into()),
                donated_on: NaiveDate::from_ymd_opt(2024, 12, 24),
                receipt: "receipts/3.png".into(),
                ..DonationForm::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(dated.user_id, None);

    let negative = ctx
        .shelter
        .donations
        .donate(
            &DonationForm {
                donor_name: Some("María".into()),
                amount_cents: Some(-1),
                receipt: "receipts/4.png".into(),
                ..DonationForm::default()
            },
            None,
        )
        .await;
    assert!(matches!(negative, Err(ShelterError::Validation(_))));

    let receipts = ctx.shelter.donations.receipts().await.unwrap();
    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[0].donor_name, "@carla");
}

#[tokio::test]
async fn users_with_records_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let donor = ctx.user("carla").await;
    let idle = ctx.user("luis").await;

    ctx.shelter
        .donations
        .donate(&DonationForm { receipt: "r.png".into(), ..DonationForm::default() }, Some(&donor))
        .await
        .unwrap();

    let error = ctx.shelter.users.delete(&donor.public_id).await.unwrap_err();
    match error {
        ShelterError::Conflict(message) => assert!(message.contains("1 donation(s)")),
        other => panic!("unexpected error: {other}"),
    }

    ctx.shelter.users.delete(&idle.public_id).await.unwrap();
    assert!(matches!(
        ctx.shelter.users.get(&idle.public_id).await,
        Err(ShelterError::NotFound(_))
    ));

    let promoted = ctx
        .shelter
        .users
        .change_role(&donor.public_id, UserRole::Volunteer)
        .await
        .unwrap();
    assert_eq!(promoted.role, UserRole::Volunteer);
}

#[tokio::test]
async fn password_reset_link_is_emailed() {
    let ctx = TestContext::new().await;
    ctx.user("carla").await;

    let outcome = ctx.shelter.accounts.forgot_password("carla@example.cl").await.unwrap();
    assert!(outcome.warnings.is_empty());

    let outbox = OutboundEmailRepository::new(ctx.pool.clone())
        .list_for_recipient("carla@example.cl")
        .await
        .unwrap();
    assert_eq!(outbox.len(), 1);
    assert!(outbox[0]
        .body
        .contains("http://127.0.0.1:7070/api/auth/password/reset/"));
}
