use std::sync::Arc;

use uuid::Uuid;

use super::normalize_email;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User, UserChanges};
use crate::repository::UserRepository;
use crate::schema::{
    AdminUserCreate, PaginatedResponse, PaginationQuery, UserCreate, UserListResponse,
    UserResponse, UserUpdate, UserUpdateAdmin,
};
use crate::utils::hash_password;

/// User account management, for both self-service and admin routes
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> Result<()> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::email_taken(email)),
            _ => Ok(()),
        }
    }

    async fn apply_changes(&self, user_id: Uuid, changes: UserChanges) -> Result<UserResponse> {
        if changes.is_empty() {
            return self.get_user_by_id(user_id).await;
        }
        if let Some(email) = &changes.email {
            self.ensure_email_free(email, Some(user_id)).await?;
        }
        self.users
            .update(user_id, changes)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::user_not_found(user_id))
    }

    pub async fn register(&self, data: UserCreate) -> Result<UserResponse> {
        let email = normalize_email(&data.email);
        self.ensure_email_free(&email, None).await?;

        let hashed_password = hash_password(&data.password, self.bcrypt_cost)?;
        let user = self
            .users
            .create(NewUser::new(email, hashed_password, data.full_name))
            .await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user.into())
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<UserResponse> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::user_not_found(user_id))
    }

    pub async fn update_me(&self, user: &User, data: UserUpdate) -> Result<UserResponse> {
        let changes = UserChanges {
            email: data.email.as_deref().map(normalize_email),
            full_name: data.full_name,
            ..Default::default()
        };
        self.apply_changes(user.id, changes).await
    }

    pub async fn list_users(&self, pagination: PaginationQuery) -> Result<UserListResponse> {
        let users = self
            .users
            .list(pagination.offset(), pagination.limit())
            .await?;
        let total = self.users.count().await?;

        Ok(PaginatedResponse {
            items: users.into_iter().map(Into::into).collect(),
            total,
            page: pagination.page,
            size: pagination.size,
        })
    }

    pub async fn admin_create_user(&self, data: AdminUserCreate) -> Result<UserResponse> {
        let email = normalize_email(&data.email);
        self.ensure_email_free(&email, None).await?;

        let hashed_password = hash_password(&data.password, self.bcrypt_cost)?;
        let user = self
            .users
            .create(NewUser {
                email,
                hashed_password,
                full_name: data.full_name,
                is_active: data.is_active,
                is_verified: data.is_verified,
                role: data.role,
            })
            .await?;

        tracing::info!("Admin created user {} with role {:?}", user.id, user.role);
        Ok(user.into())
    }

    pub async fn admin_update_user(
        &self,
        user_id: Uuid,
        data: UserUpdateAdmin,
    ) -> Result<UserResponse> {
        let hashed_password = data
            .password
            .as_deref()
            .map(|password| hash_password(password, self.bcrypt_cost))
            .transpose()?;

        let changes = UserChanges {
            email: data.email.as_deref().map(normalize_email),
            hashed_password,
            full_name: data.full_name,
            is_active: data.is_active,
            is_verified: data.is_verified,
            role: data.role,
        };
        self.apply_changes(user_id, changes).await
    }

    /// Hard delete; the user's video entries and refresh tokens cascade.
    pub async fn admin_delete_user(&self, user_id: Uuid) -> Result<()> {
        if !self.users.delete(user_id).await? {
            return Err(AppError::user_not_found(user_id));
        }
        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }
}
