use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

use crate::entities::{Donation, NewDonation};
use crate::types::{DatabaseError, DatabaseResult};

const DONATION_SELECT: &str = "SELECT id, user_id, donor_name, email, amount_cents, donated_on, receipt, comment FROM donations";

#[derive(Clone)]
pub struct DonationRepository {
    pool: SqlitePool,
}

impl DonationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, donation: &NewDonation) -> DatabaseResult<Donation> {
        let result = sqlx::query(
            "INSERT INTO donations (user_id, donor_name, email, amount_cents, donated_on, receipt, comment)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(donation.user_id)
        .bind(&donation.donor_name)
        .bind(&donation.email)
        .bind(donation.amount_cents)
        .bind(donation.donated_on)
        .bind(&donation.receipt)
        .bind(&donation.comment)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(donation_id = id, donor = %donation.donor_name, "donation recorded");

        let row = sqlx::query(&format!("{DONATION_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("donation {id}")))?;
        map_donation(&row)
    }

    /// Donations newest first, as shown on the public receipts page.
    pub async fn list_recent_first(&self) -> DatabaseResult<Vec<Donation>> {
        let rows = sqlx::query(&format!("{DONATION_SELECT} ORDER BY donated_on DESC, id DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_donation).collect()
    }
}

fn map_donation(row: &SqliteRow) -> DatabaseResult<Donation> {
    Ok(Donation {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        donor_name: row.try_get("donor_name")?,
        email: row.try_get("email")?,
        amount_cents: row.try_get("amount_cents")?,
        donated_on: row.try_get("donated_on")?,
        receipt: row.try_get("receipt")?,
        comment: row.try_get("comment")?,
    })
}
