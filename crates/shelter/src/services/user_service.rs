//! Account administration.

use rescatando_database::{User, UserRepository, UserRole};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{ShelterError, ShelterResult};

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> ShelterResult<Vec<User>> {
        Ok(self.users.list_by_name().await?)
    }

    pub async fn get(&self, public_id: &str) -> ShelterResult<User> {
        self.users
            .find_by_public_id(public_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(format!("user {public_id}")))
    }

    pub async fn change_role(&self, public_id: &str, role: UserRole) -> ShelterResult<User> {
        let user = self.get(public_id).await?;
        self.users.update_role(user.id, role).await?;
        Ok(User { role, ..user })
    }

    /// Delete an account that owns no shelter records.
    pub async fn delete(&self, public_id: &str) -> ShelterResult<()> {
        let user = self.get(public_id).await?;
        let dependents = self.users.dependents(user.id).await?;

        if !dependents.is_empty() {
            let mut reasons = Vec::new();
            if dependents.volunteers > 0 {
                reasons.push(format!("{} volunteer record(s)", dependents.volunteers));
            }
            if dependents.adopters > 0 {
                reasons.push(format!("{} adopter profile(s)", dependents.adopters));
            }
            if dependents.donations > 0 {
                reasons.push(format!("{} donation(s)", dependents.donations));
            }
            return Err(ShelterError::conflict(format!(
                "{} cannot be deleted because they have {}",
                user.name,
                reasons.join(", ")
            )));
        }

        self.users.delete(user.id).await?;
        info!(user = %user.public_id, "user removed by administrator");
        Ok(())
    }
}
