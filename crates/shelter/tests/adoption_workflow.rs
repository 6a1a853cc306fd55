use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rescatando_auth::{Authenticator, Registration};
use rescatando_config::{AppConfig, AuthConfig, DatabaseConfig};
use rescatando_database::{
    initialize_database, AdopterProfile, AdoptionStatus, AnimalInput, Avatar,
    InterviewResult, InterviewSubject, MedicalRecordInput, NewVolunteerApplication, RequestStatus,
    User, VolunteerTeam,
};
use rescatando_shelter::{
    ContractContext, ContractRenderer, DocumentError, EmailMessage, MailError, Mailer,
    ShelterError, ShelterServices,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Delivery("relay unreachable".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
struct StubRenderer {
    fail: AtomicBool,
    discarded: Mutex<Vec<String>>,
}

#[async_trait]
impl ContractRenderer for StubRenderer {
    async fn render(&self, context: &ContractContext) -> Result<String, DocumentError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DocumentError::Rendering("storage offline".into()));
        }
        Ok(format!("contracts/contract_{}.txt", context.contract.id))
    }

    async fn discard(&self, path: &str) -> Result<(), DocumentError> {
        self.discarded.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

struct TestContext {
    pool: SqlitePool,
    shelter: ShelterServices,
    mailer: Arc<RecordingMailer>,
    renderer: Arc<StubRenderer>,
    admin: User,
    adopter: User,
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

        let auth = Authenticator::new(pool.clone(), AuthConfig::default());
        let admin = auth
            .ensure_admin("admin", "Administrador", "admin@rescatando.com", "admin123")
            .await
            .unwrap()
            .unwrap();
        let adopter = auth
            .register(&Registration {
                name: "Ana Pérez".into(),
                account: "ana".into(),
                email: "ana@example.cl".into(),
                password: "secreto".into(),
                password_confirmation: "secreto".into(),
                phone: None,
                address: None,
                avatar: Avatar::Cat,
            })
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::default());
        let renderer = Arc::new(StubRenderer::default());
        let shelter = ShelterServices::new(
            pool.clone(),
            auth,
            mailer.clone(),
            renderer.clone(),
            &AppConfig::default(),
        );

        Self {
            pool,
            shelter,
            mailer,
            renderer,
            admin,
            adopter,
            _temp_dir: temp_dir,
        }
    }

    async fn animal(&self, name: &str) -> i64 {
        self.shelter
            .animals
            .create(
                &AnimalInput {
                    name: name.into(),
                    species: "Dog".into(),
                    age: 3,
                    sex: "Female".into(),
                    health_status: "Healthy".into(),
                    description: "Loves walks".into(),
                    photo: None,
                    foster_home_id: None,
                },
                &MedicalRecordInput::default(),
            )
            .await
            .unwrap()
            .animal
            .id
    }

    async fn request(&self, animal_id: i64) -> i64 {
        let profile = AdopterProfile {
            name: "Ana Pérez".into(),
            phone: "+56911112222".into(),
            national_id: "12.345.678-9".into(),
            address: "Los Aromos 12".into(),
            city: "Santiago".into(),
            age: 30,
            accepts_follow_up: true,
            ..AdopterProfile::default()
        };
        self.shelter
            .adoptions
            .submit_request(&self.adopter, animal_id, &profile)
            .await
            .unwrap()
            .id
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn available(&self, animal_id: i64) -> bool {
        self.shelter.animals.get(animal_id).await.unwrap().available
    }

    async fn adoptions_of(&self, animal_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM adoptions WHERE animal_id = ?")
            .bind(animal_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn application(&self, full_name: &str) -> i64 {
        self.shelter
            .volunteers
            .submit(
                &NewVolunteerApplication {
                    full_name: full_name.into(),
                    email: "pedro@example.cl".into(),
                    phone: "+56933334444".into(),
                    address: "Providencia".into(),
                    instagram: None,
                    team: VolunteerTeam::Rescue,
                    experience: String::new(),
                    motivation: "I want to help".into(),
                    additional_info: None,
                },
                None,
            )
            .await
            .unwrap()
            .id
    }
}

fn interview_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 2)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn approving_creates_one_adoption_and_contract() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    assert!(ctx.available(animal_id).await);

    let outcome = ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    let approved = outcome.value;
    assert_eq!(approved.request.request.status, RequestStatus::Approved);
    assert_eq!(approved.request.request.processed_by, Some(ctx.admin.id));
    assert_eq!(approved.adoption.status, AdoptionStatus::ContractGenerated);
    assert_eq!(approved.adoption.request_id, Some(request_id));
    assert_eq!(approved.contract.adoption_id, approved.adoption.id);
    assert!(approved.contract.accepts_follow_up);
    assert_eq!(
        approved.contract.document_path.as_deref(),
        Some(format!("contracts/contract_{}.txt", approved.contract.id).as_str())
    );

    assert!(!ctx.available(animal_id).await);
    assert_eq!(ctx.count("adoptions").await, 1);
    assert_eq!(ctx.count("contracts").await, 1);

    let sent = ctx.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@example.cl");
    assert_eq!(sent[0].subject, "Adoption approved - Luna");
}

#[tokio::test]
async fn second_approval_is_refused_and_writes_nothing() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;

    ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap();
    let error = ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap_err();

    assert!(matches!(error, ShelterError::InvalidTransition(_)));
    assert_eq!(ctx.count("adoptions").await, 1);
    assert_eq!(ctx.count("contracts").await, 1);
}

#[tokio::test]
async fn approving_a_competing_request_conflicts() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let first = ctx.request(animal_id).await;
    let second = ctx.request(animal_id).await;

    ctx.shelter.adoptions.approve(first, &ctx.admin).await.unwrap();
    let error = ctx.shelter.adoptions.approve(second, &ctx.admin).await.unwrap_err();

    assert!(matches!(error, ShelterError::Conflict(_)));
    let second = ctx.shelter.adoptions.get_request(second).await.unwrap();
    assert_eq!(second.request.status, RequestStatus::Pending);
    assert_eq!(ctx.count("adoptions").await, 1);
}

#[tokio::test]
async fn requests_for_adopted_animals_are_refused() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap();

    let error = ctx
        .shelter
        .adoptions
        .submit_request(&ctx.adopter, animal_id, &AdopterProfile {
            name: "Ana".into(),
            phone: "1".into(),
            national_id: "1".into(),
            address: "x".into(),
            age: 30,
            ..AdopterProfile::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(error, ShelterError::Conflict(_)));
}

#[tokio::test]
async fn rejecting_never_creates_an_adoption() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;

    let outcome = ctx
        .shelter
        .adoptions
        .reject(request_id, &ctx.admin, Some("Housing does not allow pets"))
        .await
        .unwrap();

    assert_eq!(outcome.value.request.status, RequestStatus::Rejected);
    assert_eq!(
        outcome.value.request.rejection_reason.as_deref(),
        Some("Housing does not allow pets")
    );
    assert_eq!(ctx.count("adoptions").await, 0);
    assert!(ctx.available(animal_id).await);
    assert!(ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.is_err());
}

#[tokio::test]
async fn interview_flow_records_schedule_and_notes() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    let at = NaiveDate::from_ymd_opt(2025, 5, 2)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();

    let outcome = ctx
        .shelter
        .adoptions
        .schedule_interview(request_id, &ctx.admin, at, Some("https://meet.example/luna"))
        .await
        .unwrap();
    assert_eq!(outcome.value.request.status, RequestStatus::InterviewScheduled);
    assert_eq!(outcome.value.request.interview_at, Some(at));

    let done = ctx
        .shelter
        .adoptions
        .mark_interview_done(request_id, &ctx.admin, Some("Great fit"))
        .await
        .unwrap();
    assert_eq!(done.request.status, RequestStatus::InterviewDone);
    assert_eq!(done.request.interview_notes.as_deref(), Some("Great fit"));
    assert_eq!(done.request.meeting_link.as_deref(), Some("https://meet.example/luna"));

    let error = ctx
        .shelter
        .adoptions
        .schedule_interview(request_id, &ctx.admin, at, None)
        .await
        .unwrap_err();
    assert!(matches!(error, ShelterError::InvalidTransition(_)));
}

#[tokio::test]
async fn deleting_an_adoption_restores_availability() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    let approved = ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap().value;

    let outcome = ctx
        .shelter
        .adoptions
        .delete_adoption(approved.adoption.id)
        .await
        .unwrap();

    assert!(outcome.warnings.is_empty());
    assert!(ctx.available(animal_id).await);
    assert_eq!(ctx.count("adoptions").await, 0);
    assert_eq!(ctx.count("contracts").await, 0);

    let request = ctx.shelter.adoptions.get_request(request_id).await.unwrap();
    assert_eq!(request.request.status, RequestStatus::Rejected);
    assert_eq!(
        request.request.rejection_reason.as_deref(),
        Some("Adoption cancelled by the administration")
    );
    assert_eq!(
        ctx.renderer.discarded.lock().unwrap().as_slice(),
        [format!("contracts/contract_{}.txt", approved.contract.id)]
    );
}

#[tokio::test]
async fn deleting_an_approved_request_keeps_the_adoption() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    let approved = ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap().value;

    let restored = ctx.shelter.adoptions.delete_request(request_id).await.unwrap();

    assert!(!restored);
    assert!(!ctx.available(animal_id).await);
    let adoption = ctx.shelter.adoptions.get_adoption(approved.adoption.id).await.unwrap();
    assert_eq!(adoption.adoption.request_id, None);
}

#[tokio::test]
async fn document_failure_leaves_adoption_in_progress_until_retried() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    ctx.renderer.fail.store(true, Ordering::SeqCst);

    let outcome = ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("contract document"));
    assert_eq!(outcome.value.adoption.status, AdoptionStatus::InProgress);
    assert_eq!(outcome.value.contract.document_path, None);
    assert!(!ctx.available(animal_id).await);

    let adoption_id = outcome.value.adoption.id;
    assert!(matches!(
        ctx.shelter.adoptions.complete(adoption_id).await,
        Err(ShelterError::InvalidTransition(_))
    ));
    assert!(matches!(
        ctx.shelter.adoptions.generate_contract(adoption_id).await,
        Err(ShelterError::Document(_))
    ));

    ctx.renderer.fail.store(false, Ordering::SeqCst);
    let (adoption, contract) = ctx.shelter.adoptions.generate_contract(adoption_id).await.unwrap();
    assert_eq!(adoption.status, AdoptionStatus::ContractGenerated);
    assert_eq!(contract.id, outcome.value.contract.id);
    assert!(contract.document_path.is_some());
    assert_eq!(ctx.count("contracts").await, 1);

    let completed = ctx.shelter.adoptions.complete(adoption_id).await.unwrap();
    assert_eq!(completed.status, AdoptionStatus::Completed);
    assert!(completed.completed_on.is_some());
}

#[tokio::test]
async fn email_failure_becomes_a_warning() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    ctx.mailer.fail.store(true, Ordering::SeqCst);

    let outcome = ctx
        .shelter
        .adoptions
        .reject(request_id, &ctx.admin, None)
        .await
        .unwrap();

    assert_eq!(outcome.value.request.status, RequestStatus::Rejected);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("ana@example.cl"));
}

#[tokio::test]
async fn contracts_are_signed_by_each_party() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    let contract = ctx
        .shelter
        .adoptions
        .approve(request_id, &ctx.admin)
        .await
        .unwrap()
        .value
        .contract;

    let signed = ctx.shelter.adoptions.sign_as_adopter(&ctx.adopter, contract.id).await.unwrap();
    assert!(signed.adopter_signed && !signed.admin_signed);

    let forbidden = ctx.shelter.adoptions.sign_as_adopter(&ctx.admin, contract.id).await;
    assert!(matches!(forbidden, Err(ShelterError::Forbidden(_))));

    let signed = ctx.shelter.adoptions.sign_as_admin(contract.id).await.unwrap();
    assert!(signed.is_fully_signed());

    let mine = ctx.shelter.adoptions.my_adoptions(&ctx.adopter).await.unwrap();
    assert_eq!(mine.requests.len(), 1);
    assert_eq!(mine.adoptions.len(), 1);
    assert_eq!(mine.contracts.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approve_and_reject_settle_on_one_decision() {
    let ctx = TestContext::new().await;

    for round in 0..20 {
        let animal_id = ctx.animal(&format!("Luna {round}")).await;
        let request_id = ctx.request(animal_id).await;

        let (approved, rejected) = tokio::join!(
            ctx.shelter.adoptions.approve(request_id, &ctx.admin),
            ctx.shelter.adoptions.reject(request_id, &ctx.admin, Some("Not a fit")),
        );

        assert!(
            approved.is_ok() != rejected.is_ok(),
            "round {round}: approve {:?}, reject {:?}",
            approved.as_ref().map(|_| ()),
            rejected.as_ref().map(|_| ())
        );
        let loser = match (&approved, &rejected) {
            (Err(error), Ok(_)) | (Ok(_), Err(error)) => error,
            _ => unreachable!(),
        };
        assert!(
            matches!(loser, ShelterError::InvalidTransition(_) | ShelterError::Conflict(_)),
            "round {round}: {loser:?}"
        );

        let status = ctx.shelter.adoptions.get_request(request_id).await.unwrap().request.status;
        if approved.is_ok() {
            assert_eq!(status, RequestStatus::Approved, "round {round}");
            assert_eq!(ctx.adoptions_of(animal_id).await, 1, "round {round}");
            assert!(!ctx.available(animal_id).await, "round {round}");
        } else {
            assert_eq!(status, RequestStatus::Rejected, "round {round}");
            assert_eq!(ctx.adoptions_of(animal_id).await, 0, "round {round}");
            assert!(ctx.available(animal_id).await, "round {round}");
        }
    }
}

#[tokio::test]
async fn rejecting_an_approved_request_is_refused() {
    let ctx = TestContext::new().await;
    let animal_id = ctx.animal("Luna").await;
    let request_id = ctx.request(animal_id).await;
    ctx.shelter.adoptions.approve(request_id, &ctx.admin).await.unwrap();

    let error = ctx
        .shelter
        .adoptions
        .reject(request_id, &ctx.admin, None)
        .await
        .unwrap_err();

    assert!(matches!(error, ShelterError::InvalidTransition(_)));
    let request = ctx.shelter.adoptions.get_request(request_id).await.unwrap().request;
    assert_eq!(request.status, RequestStatus::Approved);
    assert_eq!(ctx.adoptions_of(animal_id).await, 1);
}

#[tokio::test]
async fn adoption_interviews_are_recorded_then_settled_by_the_decision() {
    let ctx = TestContext::new().await;
    let luna = ctx.request(ctx.animal("Luna").await).await;
    let toby = ctx.request(ctx.animal("Toby").await).await;

    for request_id in [luna, toby] {
        ctx.shelter
            .adoptions
            .schedule_interview(request_id, &ctx.admin, interview_time(), None)
            .await
            .unwrap();
        ctx.shelter
            .adoptions
            .mark_interview_done(request_id, &ctx.admin, Some("Great fit"))
            .await
            .unwrap();
    }

    let interviews = ctx.shelter.dashboard.interviews().await.unwrap();
    assert_eq!(interviews.len(), 2);
    let record = interviews.iter().find(|record| record.subject_id == luna).unwrap();
    assert_eq!(record.subject, InterviewSubject::AdoptionRequest);
    assert_eq!(record.interviewee, "Ana Pérez");
    assert_eq!(record.held_on, interview_time().date());
    assert_eq!(record.observations, "Great fit");
    assert_eq!(record.result, InterviewResult::Pending);
    assert_eq!(record.interviewer_id, Some(ctx.admin.id));

    ctx.shelter.adoptions.approve(luna, &ctx.admin).await.unwrap();
    ctx.shelter
        .adoptions
        .reject(toby, &ctx.admin, Some("No fenced yard"))
        .await
        .unwrap();

    let interviews = ctx.shelter.dashboard.interviews().await.unwrap();
    let result_for = |request_id: i64| {
        interviews
            .iter()
            .find(|record| record.subject_id == request_id)
            .map(|record| record.result)
    };
    assert_eq!(result_for(luna), Some(InterviewResult::Approved));
    assert_eq!(result_for(toby), Some(InterviewResult::Rejected));
}

#[tokio::test]
async fn volunteer_decisions_after_an_interview_leave_a_record() {
    let ctx = TestContext::new().await;
    let interviewed = ctx.application("Pedro Soto").await;
    let direct = ctx.application("Marta Rojas").await;

    ctx.shelter
        .volunteers
        .schedule_interview(interviewed, &ctx.admin, interview_time())
        .await
        .unwrap();
    ctx.shelter
        .volunteers
        .approve(interviewed, &ctx.admin, Some("Knows the area"))
        .await
        .unwrap();
    ctx.shelter.volunteers.approve(direct, &ctx.admin, None).await.unwrap();

    let interviews = ctx.shelter.dashboard.interviews().await.unwrap();
    assert_eq!(interviews.len(), 1);
    let record = &interviews[0];
    assert_eq!(record.subject, InterviewSubject::VolunteerApplication);
    assert_eq!(record.subject_id, interviewed);
    assert_eq!(record.interviewee, "Pedro Soto");
    assert_eq!(record.held_on, interview_time().date());
    assert_eq!(record.observations, "Knows the area");
    assert_eq!(record.result, InterviewResult::Approved);
}

#[tokio::test]
async fn dashboard_groups_every_status_into_its_bucket() {
    let ctx = TestContext::new().await;

    let pending = ctx.request(ctx.animal("Pending").await).await;
    let scheduled = ctx.request(ctx.animal("Scheduled").await).await;
    let interviewed = ctx.request(ctx.animal("Interviewed").await).await;
    let approved = ctx.request(ctx.animal("Approved").await).await;
    let rejected = ctx.request(ctx.animal("Rejected").await).await;
    let undocumented = ctx.request(ctx.animal("Undocumented").await).await;
    let completed = ctx.request(ctx.animal("Completed").await).await;

    let adoptions = &ctx.shelter.adoptions;
    for request_id in [scheduled, interviewed] {
        adoptions
            .schedule_interview(request_id, &ctx.admin, interview_time(), None)
            .await
            .unwrap();
    }
    adoptions.mark_interview_done(interviewed, &ctx.admin, None).await.unwrap();
    let contract_generated = adoptions.approve(approved, &ctx.admin).await.unwrap().value.adoption.id;
    adoptions.reject(rejected, &ctx.admin, None).await.unwrap();
    ctx.renderer.fail.store(true, Ordering::SeqCst);
    let in_progress = adoptions.approve(undocumented, &ctx.admin).await.unwrap().value.adoption.id;
    ctx.renderer.fail.store(false, Ordering::SeqCst);
    let done = adoptions.approve(completed, &ctx.admin).await.unwrap().value.adoption.id;
    adoptions.complete(done).await.unwrap();

    let volunteers = &ctx.shelter.volunteers;
    let waiting = ctx.application("Waiting").await;
    let invited = ctx.application("Invited").await;
    let accepted = ctx.application("Accepted").await;
    let declined = ctx.application("Declined").await;
    volunteers.schedule_interview(invited, &ctx.admin, interview_time()).await.unwrap();
    volunteers.approve(accepted, &ctx.admin, None).await.unwrap();
    volunteers.reject(declined, &ctx.admin, None).await.unwrap();

    let dashboard = ctx.shelter.dashboard.load().await.unwrap();

    let request_ids = |bucket: &[rescatando_database::AdoptionRequestSummary]| {
        let mut ids: Vec<i64> = bucket.iter().map(|summary| summary.request.id).collect();
        ids.sort_unstable();
        ids
    };
    let board = &dashboard.adoption_requests;
    assert_eq!(request_ids(&board.pending), [pending]);
    assert_eq!(request_ids(&board.interview), [scheduled, interviewed]);
    assert_eq!(request_ids(&board.approved), [approved, undocumented, completed]);
    assert_eq!(request_ids(&board.rejected), [rejected]);

    let adoption_ids = |bucket: &[rescatando_database::AdoptionSummary]| {
        let mut ids: Vec<i64> = bucket.iter().map(|summary| summary.adoption.id).collect();
        ids.sort_unstable();
        ids
    };
    assert_eq!(
        adoption_ids(&dashboard.adoptions.in_process),
        [contract_generated, in_progress]
    );
    assert_eq!(adoption_ids(&dashboard.adoptions.completed), [done]);

    let applications = &dashboard.volunteer_applications;
    let application_ids = |bucket: &[rescatando_database::VolunteerApplication]| {
        bucket.iter().map(|application| application.id).collect::<Vec<_>>()
    };
    assert_eq!(application_ids(&applications.pending), [waiting]);
    assert_eq!(application_ids(&applications.interview_scheduled), [invited]);
    assert_eq!(application_ids(&applications.approved), [accepted]);
    assert_eq!(application_ids(&applications.rejected), [declined]);
    assert_eq!(applications.total, 4);
}
