//! Database repository implementations
//!
//! Each repository owns a pool for standalone queries. Statements that must
//! take part in a caller's transaction are exposed as `*_in` associated
//! functions taking a `&mut SqliteConnection`.

pub mod adopter_repository;
pub mod adoption_repository;
pub mod adoption_request_repository;
pub mod animal_repository;
pub mod contract_repository;
pub mod donation_repository;
pub mod foster_home_repository;
pub mod interview_repository;
pub mod outbound_email_repository;
pub mod password_reset_repository;
pub mod user_repository;
pub mod volunteer_application_repository;

pub use adopter_repository::*;
pub use adoption_repository::*;
pub use adoption_request_repository::*;
pub use animal_repository::*;
pub use contract_repository::*;
pub use donation_repository::*;
pub use foster_home_repository::*;
pub use interview_repository::*;
pub use outbound_email_repository::*;
pub use password_reset_repository::*;
pub use user_repository::*;
pub use volunteer_application_repository::*;
