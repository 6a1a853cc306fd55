//! Outbox record for rendered emails

use chrono::{DateTime, Utc};
use serde::Serialize;

stored_enum! {
    EmailStatus, "email status" {
        Queued => "queued",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub id: i64,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: EmailStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}
