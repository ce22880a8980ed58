use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::enums::UserRole;

/// User account row
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub role: UserRole,
}

impl NewUser {
    pub fn new(email: String, hashed_password: String, full_name: Option<String>) -> Self {
        Self {
            email,
            hashed_password,
            full_name,
            is_active: true,
            is_verified: false,
            role: UserRole::default(),
        }
    }
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub full_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub role: Option<UserRole>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.hashed_password.is_none()
            && self.full_name.is_none()
            && self.is_active.is_none()
            && self.is_verified.is_none()
            && self.role.is_none()
    }
}
