use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginatedResponse, deserialize_some};
use crate::config::{
    EMAIL_MAX_LENGTH, FULL_NAME_MAX_LENGTH, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
};
use crate::enums::UserRole;
use crate::models::User;

/// User as returned by the API; never exposes the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            is_verified: user.is_verified,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub type UserListResponse = PaginatedResponse<UserResponse>;

/// Self-service registration
#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(email, length(max = EMAIL_MAX_LENGTH))]
    pub email: String,
    #[validate(length(min = PASSWORD_MIN_LENGTH, max = PASSWORD_MAX_LENGTH))]
    pub password: String,
    #[validate(length(max = FULL_NAME_MAX_LENGTH))]
    pub full_name: Option<String>,
}

/// Admin creation, bypasses registration defaults
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUserCreate {
    #[validate(email, length(max = EMAIL_MAX_LENGTH))]
    pub email: String,
    #[validate(length(min = PASSWORD_MIN_LENGTH, max = PASSWORD_MAX_LENGTH))]
    pub password: String,
    #[validate(length(max = FULL_NAME_MAX_LENGTH))]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
}

/// `PATCH /users/me`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(email, length(max = EMAIL_MAX_LENGTH))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = FULL_NAME_MAX_LENGTH))]
    pub full_name: Option<Option<String>>,
}

/// `PATCH /admin/users/{id}`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdateAdmin {
    #[validate(email, length(max = EMAIL_MAX_LENGTH))]
    pub email: Option<String>,
    #[validate(length(min = PASSWORD_MIN_LENGTH, max = PASSWORD_MAX_LENGTH))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = FULL_NAME_MAX_LENGTH))]
    pub full_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordChange {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = PASSWORD_MIN_LENGTH, max = PASSWORD_MAX_LENGTH))]
    pub new_password: String,
}

fn default_true() -> bool {
    true
}
