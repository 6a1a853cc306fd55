//! Password recovery tokens

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// A token is honoured until `ttl` has elapsed since it was issued.
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.created_at + ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expires_after_ttl() {
        let issued = Utc::now();
        let token = PasswordResetToken {
            id: 1,
            user_id: 1,
            token: "abc".into(),
            created_at: issued,
        };

        let ttl = Duration::hours(1);
        assert!(token.is_valid_at(issued + Duration::minutes(59), ttl));
        assert!(!token.is_valid_at(issued + Duration::minutes(60), ttl));
    }
}
