//! Password recovery emails.

use std::sync::Arc;

use rescatando_auth::{AuthError, Authenticator};
use rescatando_config::ShelterConfig;

use crate::mailer::Mailer;
use crate::services::{notify, ActionOutcome};
use crate::templates;

#[derive(Clone)]
pub struct AccountService {
    auth: Authenticator,
    mailer: Arc<dyn Mailer>,
    shelter: ShelterConfig,
    public_base_url: String,
}

impl AccountService {
    pub fn new(
        auth: Authenticator,
        mailer: Arc<dyn Mailer>,
        shelter: ShelterConfig,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            mailer,
            shelter,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/api/auth/password/reset/{token}",
            self.public_base_url.trim_end_matches('/')
        )
    }

    /// Issue a reset token and email the link to the account owner.
    pub async fn forgot_password(&self, email: &str) -> Result<ActionOutcome<()>, AuthError> {
        let (user, token) = self.auth.request_password_reset(email).await?;

        let message = templates::password_reset(
            &self.shelter,
            &user.email,
            &user.name,
            &self.reset_link(&token.token),
        );
        let mut outcome = ActionOutcome::new(());
        notify(self.mailer.as_ref(), message, &mut outcome.warnings).await;
        Ok(outcome)
    }
}
