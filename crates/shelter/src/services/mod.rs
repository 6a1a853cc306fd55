//! Business logic services for the shelter.
//!
//! Services coordinate repositories inside transactions and enforce the
//! workflow tables. Notifications and document rendering run after commit;
//! their failures come back as warnings on an [`ActionOutcome`] instead of
//! undoing the committed change.

pub mod account_service;
pub mod adoption_service;
pub mod animal_service;
pub mod dashboard_service;
pub mod donation_service;
pub mod user_service;
pub mod volunteer_service;

pub use account_service::AccountService;
pub use adoption_service::{AdoptionService, ApprovedAdoption, MyAdoptions};
pub use animal_service::AnimalService;
pub use dashboard_service::{
    AdoptionBoard, ApplicationBoard, Dashboard, DashboardService, RequestBoard,
};
pub use donation_service::{DonationForm, DonationService};
pub use user_service::UserService;
pub use volunteer_service::VolunteerService;

use serde::Serialize;
use tracing::warn;

use crate::mailer::{EmailMessage, Mailer};

/// Result of a state-changing action plus any non-fatal follow-up failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> ActionOutcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionOutcome<U> {
        ActionOutcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Send `message`, recording a warning when delivery fails.
pub(crate) async fn notify(mailer: &dyn Mailer, message: EmailMessage, warnings: &mut Vec<String>) {
    if let Err(err) = mailer.send(&message).await {
        warn!(to = %message.to, subject = %message.subject, error = %err, "notification email failed");
        warnings.push(format!("the email to {} could not be sent: {err}", message.to));
    }
}
