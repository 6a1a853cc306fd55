use chrono::{NaiveDate, Utc};
use rescatando_auth::validation::{
    required, sanitize_optional, validate_email, EMAIL_MAX, NAME_MAX, TEXT_MAX,
};
use rescatando_database::{Donation, DonationRepository, NewDonation, User};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::errors::{ShelterError, ShelterResult};

/// Donation form. Signed-in donors are recorded under their account handle,
/// so `donor_name` is only required from anonymous donors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DonationForm {
    pub donor_name: Option<String>,
    pub email: Option<String>,
    pub amount_cents: Option<i64>,
    pub donated_on: Option<NaiveDate>,
    /// Reference to the uploaded transfer receipt.
    pub receipt: String,
    pub comment: Option<String>,
}

#[derive(Clone)]
pub struct DonationService {
    donations: DonationRepository,
}

impl DonationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            donations: DonationRepository::new(pool),
        }
    }

    pub async fn donate(&self, form: &DonationForm, donor: Option<&User>) -> ShelterResult<Donation> {
        let donor_name = match donor {
            Some(user) => format!("@{}", user.account),
            None => form
                .donor_name
                .as_deref()
                .and_then(|name| sanitize_optional(Some(name), NAME_MAX))
                .ok_or_else(|| ShelterError::validation("please enter your full name"))?,
        };

        if let Some(amount) = form.amount_cents {
            if amount <= 0 {
                return Err(ShelterError::validation("amount must be positive"));
            }
        }

        let email = sanitize_optional(form.email.as_deref(), EMAIL_MAX)
            .or_else(|| donor.map(|user| user.email.clone()));
        if let Some(email) = &email {
            validate_email(email)?;
        }

        let donation = NewDonation {
            user_id: donor.map(|user| user.id),
            donor_name,
            email,
            amount_cents: form.amount_cents,
            donated_on: form.donated_on.unwrap_or_else(|| Utc::now().date_naive()),
            receipt: required("receipt", &form.receipt, 255)?,
            comment: sanitize_optional(form.comment.as_deref(), TEXT_MAX),
        };

        Ok(self.donations.create(&donation).await?)
    }

    /// Public receipt listing, newest first.
    pub async fn receipts(&self) -> ShelterResult<Vec<Donation>> {
        Ok(self.donations.list_recent_first().await?)
    }
}
