mod error;
mod state;
mod util;

pub mod docs;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/openapi.json", get(docs::openapi_json))
        // Accounts
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route(
            "/api/auth/password/forgot",
            post(routes::auth::forgot_password),
        )
        .route(
            "/api/auth/password/reset/:token",
            post(routes::auth::reset_password),
        )
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route("/api/profile/adoptions", get(routes::profile::my_adoptions))
        .route(
            "/api/profile/contracts/:id/sign",
            post(routes::profile::sign_contract),
        )
        // Public catalogue, donations and applications
        .route("/api/animals", get(routes::animals::list_available))
        .route("/api/animals/:id", get(routes::animals::get_animal))
        .route(
            "/api/animals/:id/adoption-requests",
            post(routes::animals::request_adoption),
        )
        .route("/api/donations", post(routes::donations::donate))
        .route("/api/donations/receipts", get(routes::donations::receipts))
        .route(
            "/api/volunteer-applications",
            post(routes::volunteers::submit),
        )
        // Staff back office
        .route(
            "/api/staff/animals",
            get(routes::staff::list_animals).post(routes::staff::create_animal),
        )
        .route(
            "/api/staff/animals/:id",
            get(routes::staff::get_animal)
                .put(routes::staff::update_animal)
                .delete(routes::staff::delete_animal),
        )
        .route(
            "/api/staff/animals/:id/medical-record",
            get(routes::staff::get_medical_record).put(routes::staff::update_medical_record),
        )
        .route(
            "/api/staff/foster-homes",
            get(routes::staff::list_foster_homes).post(routes::staff::create_foster_home),
        )
        .route(
            "/api/staff/volunteers",
            get(routes::staff::list_volunteers).post(routes::staff::create_volunteer),
        )
        .route("/api/staff/dashboard", get(routes::staff::dashboard))
        .route("/api/staff/interviews", get(routes::staff::list_interviews))
        // Adoption request workflow
        .route(
            "/api/staff/adoption-requests",
            get(routes::adoptions::list_requests),
        )
        .route(
            "/api/staff/adoption-requests/:id",
            get(routes::adoptions::get_request).delete(routes::adoptions::delete_request),
        )
        .route(
            "/api/staff/adoption-requests/:id/schedule-interview",
            post(routes::adoptions::schedule_interview),
        )
        .route(
            "/api/staff/adoption-requests/:id/interview-done",
            post(routes::adoptions::interview_done),
        )
        .route(
            "/api/staff/adoption-requests/:id/approve",
            post(routes::adoptions::approve),
        )
        .route(
            "/api/staff/adoption-requests/:id/reject",
            post(routes::adoptions::reject),
        )
        // Adoption lifecycle
        .route("/api/staff/adoptions", get(routes::adoptions::list_adoptions))
        .route(
            "/api/staff/adoptions/:id",
            get(routes::adoptions::get_adoption).delete(routes::adoptions::delete_adoption),
        )
        .route(
            "/api/staff/adoptions/:id/contract",
            post(routes::adoptions::generate_contract),
        )
        .route(
            "/api/staff/adoptions/:id/complete",
            post(routes::adoptions::complete),
        )
        // Volunteer application workflow
        .route(
            "/api/staff/volunteer-applications",
            get(routes::volunteers::list),
        )
        .route(
            "/api/staff/volunteer-applications/:id",
            get(routes::volunteers::get),
        )
        .route(
            "/api/staff/volunteer-applications/:id/schedule-interview",
            post(routes::volunteers::schedule_interview),
        )
        .route(
            "/api/staff/volunteer-applications/:id/approve",
            post(routes::volunteers::approve),
        )
        .route(
            "/api/staff/volunteer-applications/:id/reject",
            post(routes::volunteers::reject),
        )
        // Administration
        .route("/api/admin/users", get(routes::admin::list_users))
        .route(
            "/api/admin/users/:public_id",
            delete(routes::admin::delete_user),
        )
        .route(
            "/api/admin/users/:public_id/role",
            put(routes::admin::change_role),
        )
        .route(
            "/api/admin/contracts/:id/sign",
            post(routes::admin::sign_contract),
        )
        .with_state(state)
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
