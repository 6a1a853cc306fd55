//! Domain entities for the database layer
//!
//! Enumerations are persisted as lowercase snake_case strings; the same
//! spelling is used on the wire.

macro_rules! stored_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::types::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(crate::types::UnknownVariant::new($kind, other)),
                }
            }
        }
    };
}

pub mod adoption;
pub mod animal;
pub mod donation;
pub mod interview;
pub mod outbound_email;
pub mod session;
pub mod user;
pub mod volunteer_application;

pub use adoption::{
    Adopter, AdopterProfile, Adoption, AdoptionRequest, AdoptionRequestSummary, AdoptionStatus,
    AdoptionSummary, Contract, RequestStatus, SignatoryParty,
};
pub use animal::{
    Animal, AnimalInput, AnimalWithRecord, FosterHome, MedicalRecord, MedicalRecordInput,
    NewFosterHome, Volunteer,
};
pub use donation::{Donation, NewDonation};
pub use interview::{InterviewRecord, InterviewResult, InterviewSubject, NewInterviewRecord};
pub use outbound_email::{EmailStatus, OutboundEmail};
pub use session::PasswordResetToken;
pub use user::{Avatar, NewUser, User, UserProfileUpdate, UserRole};
pub use volunteer_application::{
    ApplicationStatus, NewVolunteerApplication, VolunteerApplication, VolunteerTeam,
};
