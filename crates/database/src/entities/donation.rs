use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Donation {
    pub id: i64,
    pub user_id: Option<i64>,
    pub donor_name: String,
    pub email: Option<String>,
    /// Whole amount in cents; absent when the donor did not declare one.
    pub amount_cents: Option<i64>,
    pub donated_on: NaiveDate,
    pub receipt: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub user_id: Option<i64>,
    pub donor_name: String,
    pub email: Option<String>,
    pub amount_cents: Option<i64>,
    pub donated_on: NaiveDate,
    pub receipt: String,
    pub comment: Option<String>,
}
