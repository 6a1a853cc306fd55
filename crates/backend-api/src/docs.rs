use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::forgot_password,
        crate::routes::auth::reset_password,
        crate::routes::profile::get_profile,
        crate::routes::profile::update_profile,
        crate::routes::profile::my_adoptions,
        crate::routes::profile::sign_contract,
        crate::routes::animals::list_available,
        crate::routes::animals::get_animal,
        crate::routes::animals::request_adoption,
        crate::routes::donations::donate,
        crate::routes::donations::receipts,
        crate::routes::volunteers::submit,
        crate::routes::staff::list_animals,
        crate::routes::staff::create_animal,
        crate::routes::staff::get_animal,
        crate::routes::staff::update_animal,
        crate::routes::staff::delete_animal,
        crate::routes::staff::get_medical_record,
        crate::routes::staff::update_medical_record,
        crate::routes::staff::list_foster_homes,
        crate::routes::staff::create_foster_home,
        crate::routes::staff::list_volunteers,
        crate::routes::staff::create_volunteer,
        crate::routes::staff::dashboard,
        crate::routes::staff::list_interviews,
        crate::routes::adoptions::list_requests,
        crate::routes::adoptions::get_request,
        crate::routes::adoptions::schedule_interview,
        crate::routes::adoptions::interview_done,
        crate::routes::adoptions::approve,
        crate::routes::adoptions::reject,
        crate::routes::adoptions::delete_request,
        crate::routes::adoptions::list_adoptions,
        crate::routes::adoptions::get_adoption,
        crate::routes::adoptions::generate_contract,
        crate::routes::adoptions::complete,
        crate::routes::adoptions::delete_adoption,
        crate::routes::volunteers::list,
        crate::routes::volunteers::get,
        crate::routes::volunteers::schedule_interview,
        crate::routes::volunteers::approve,
        crate::routes::volunteers::reject,
        crate::routes::admin::list_users,
        crate::routes::admin::change_role,
        crate::routes::admin::delete_user,
        crate::routes::admin::sign_contract
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::MessageResponse,
            crate::routes::RequestPayload,
            crate::routes::AdoptionPayload,
            crate::routes::ContractPayload,
            crate::routes::ApplicationPayload,
            crate::routes::RequestDeletedPayload,
            crate::routes::NoPayload,
            crate::routes::health::HealthResponse,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::ForgotPasswordRequest,
            crate::routes::auth::ResetPasswordRequest,
            crate::routes::auth::SessionResponse,
            crate::routes::staff::CreateAnimalRequest,
            crate::routes::staff::CreateVolunteerRequest,
            crate::routes::adoptions::ScheduleInterviewRequest,
            crate::routes::adoptions::InterviewDoneRequest,
            crate::routes::adoptions::RejectRequest,
            crate::routes::adoptions::AdoptionDetail,
            crate::routes::volunteers::ApplicationInterviewRequest,
            crate::routes::volunteers::ApplicationDecisionRequest,
            crate::routes::admin::ChangeRoleRequest,
            rescatando_auth::Registration,
            rescatando_auth::ProfileChanges,
            rescatando_database::User,
            rescatando_database::UserRole,
            rescatando_database::Avatar,
            rescatando_database::Animal,
            rescatando_database::AnimalInput,
            rescatando_database::AnimalWithRecord,
            rescatando_database::MedicalRecord,
            rescatando_database::MedicalRecordInput,
            rescatando_database::FosterHome,
            rescatando_database::NewFosterHome,
            rescatando_database::Volunteer,
            rescatando_database::AdopterProfile,
            rescatando_database::AdoptionRequest,
            rescatando_database::AdoptionRequestSummary,
            rescatando_database::RequestStatus,
            rescatando_database::Adoption,
            rescatando_database::AdoptionSummary,
            rescatando_database::AdoptionStatus,
            rescatando_database::Contract,
            rescatando_database::Donation,
            rescatando_database::VolunteerApplication,
            rescatando_database::NewVolunteerApplication,
            rescatando_database::ApplicationStatus,
            rescatando_database::VolunteerTeam,
            rescatando_database::InterviewRecord,
            rescatando_database::InterviewSubject,
            rescatando_database::InterviewResult,
            rescatando_shelter::DonationForm,
            rescatando_shelter::ApprovedAdoption,
            rescatando_shelter::MyAdoptions,
            rescatando_shelter::Dashboard,
            rescatando_shelter::services::RequestBoard,
            rescatando_shelter::services::AdoptionBoard,
            rescatando_shelter::services::ApplicationBoard
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, sessions and password recovery"),
        (name = "Profile", description = "The signed-in user's account and adoptions"),
        (name = "Animals", description = "Public animal listing and adoption requests"),
        (name = "Donations", description = "Donations and public receipts"),
        (name = "Staff", description = "Animals, medical records, foster homes and volunteers"),
        (name = "Adoption Requests", description = "Adoption request workflow"),
        (name = "Adoptions", description = "Adoption lifecycle and contracts"),
        (name = "Volunteer Applications", description = "Volunteer application workflow"),
        (name = "Admin", description = "User administration and shelter signatures")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("Bearer".to_string());
        }

        schemes.insert("bearerAuth".to_string(), scheme);
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
