//! User entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

stored_enum! {
    /// Account role. Staff (admin and volunteer) can manage animals and
    /// process requests; only admins manage users.
    UserRole, "user role" {
        Admin => "admin",
        Volunteer => "volunteer",
        Adopter => "adopter",
        User => "user",
    }
}

impl UserRole {
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Volunteer)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

stored_enum! {
    Avatar, "avatar" {
        Dog => "dog",
        Cat => "cat",
        Bird => "bird",
        Pig => "pig",
        Rat => "rat",
        Horse => "horse",
        Rabbit => "rabbit",
        Turtle => "turtle",
        Cow => "cow",
        Dinosaur => "dinosaur",
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Avatar::Dog
    }
}

/// User entity representing a shelter account
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub account: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub avatar: Avatar,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn can_manage_animals(&self) -> bool {
        self.role.is_staff()
    }
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub account: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub avatar: Avatar,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub avatar: Avatar,
}
