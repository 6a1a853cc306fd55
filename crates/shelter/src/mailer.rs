//! Outgoing notification emails.
//!
//! The backend does not speak SMTP itself. [`OutboxMailer`] validates the
//! recipient, records the rendered message in the `outbound_emails` table and
//! logs it; a relay process can drain the outbox.

use async_trait::async_trait;
use rescatando_auth::validation::validate_email;
use rescatando_database::{EmailStatus, OutboundEmailRepository};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid recipient address '{0}'")]
    InvalidRecipient(String),
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

pub struct OutboxMailer {
    outbox: OutboundEmailRepository,
    from_address: String,
}

impl OutboxMailer {
    pub fn new(pool: SqlitePool, from_address: impl Into<String>) -> Self {
        Self {
            outbox: OutboundEmailRepository::new(pool),
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if validate_email(&message.to).is_err() {
            let error = MailError::InvalidRecipient(message.to.clone());
            warn!(to = %message.to, subject = %message.subject, "refusing to queue email");
            self.outbox
                .record(
                    &message.to,
                    &message.subject,
                    &message.body,
                    EmailStatus::Failed,
                    Some(&error.to_string()),
                )
                .await
                .map_err(|e| MailError::Delivery(e.to_string()))?;
            return Err(error);
        }

        let id = self
            .outbox
            .record(&message.to, &message.subject, &message.body, EmailStatus::Queued, None)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        info!(
            email_id = id,
            from = %self.from_address,
            to = %message.to,
            subject = %message.subject,
            "queued email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescatando_config::DatabaseConfig;
    use rescatando_database::initialize_database;
    use tempfile::TempDir;

    async fn mailer() -> (OutboxMailer, OutboundEmailRepository, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = initialize_database(&DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("mail.db").display()),
            max_connections: 2,
        })
        .await
        .unwrap();
        (
            OutboxMailer::new(pool.clone(), "no-reply@rescatando.org"),
            OutboundEmailRepository::new(pool),
            dir,
        )
    }

    #[tokio::test]
    async fn valid_messages_are_queued() {
        let (mailer, outbox, _dir) = mailer().await;

        mailer
            .send(&EmailMessage {
                to: "ana@example.cl".into(),
                subject: "Hola".into(),
                body: "Bienvenida".into(),
            })
            .await
            .unwrap();

        let stored = outbox.list_for_recipient("ana@example.cl").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, EmailStatus::Queued);
        assert_eq!(stored[0].subject, "Hola");
    }

    #[tokio::test]
    async fn bad_recipients_fail_but_are_recorded() {
        let (mailer, outbox, _dir) = mailer().await;

        let error = mailer
            .send(&EmailMessage {
                to: "not-an-address".into(),
                subject: "Hola".into(),
                body: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(error, MailError::InvalidRecipient(_)));

        let stored = outbox.list_for_recipient("not-an-address").await.unwrap();
        assert_eq!(stored[0].status, EmailStatus::Failed);
        assert!(stored[0].error.is_some());
    }
}
