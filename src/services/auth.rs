use std::sync::{Arc, OnceLock};

use chrono::{Duration, Utc};

use super::normalize_email;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{NewRefreshToken, User, UserChanges};
use crate::repository::{RefreshTokenRepository, UserRepository};
use crate::schema::{PasswordChange, TokenResponse, TokenWithUserResponse};
use crate::utils::{
    generate_access_token, generate_refresh_token, hash_password, hash_refresh_token,
    verify_password,
};

/// Compared against on logins for unknown emails
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Login, token rotation and revocation
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    config: Config,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        config: Config,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            config,
        }
    }

    fn dummy_hash(&self) -> Result<&'static str> {
        if let Some(hash) = DUMMY_HASH.get() {
            return Ok(hash.as_str());
        }
        let hash = hash_password("dummy-password", self.config.bcrypt_cost)?;
        Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
    }

    async fn issue_tokens(&self, user: &User) -> Result<TokenResponse> {
        let (access_token, _) = generate_access_token(user.id, user.token_version, &self.config)?;

        let refresh_token = generate_refresh_token();
        let expires_at = Utc::now()
            + Duration::seconds(self.config.refresh_token_expiration().as_secs() as i64);
        self.refresh_tokens
            .create(NewRefreshToken {
                user_id: user.id,
                token_hash: hash_refresh_token(&refresh_token),
                expires_at,
            })
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer".into(),
            expires_in: self.config.access_token_expiration().as_secs(),
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenWithUserResponse> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            // same bcrypt work as a wrong password
            verify_password(password, self.dummy_hash()?);
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(password, &user.hashed_password) {
            tracing::info!("Failed login for user {}", user.id);
            return Err(AppError::invalid_credentials());
        }
        if !user.is_active {
            return Err(AppError::Unauthorized("User account is inactive".into()));
        }

        let tokens = self.issue_tokens(&user).await?;
        tracing::info!("User {} logged in", user.id);
        Ok(TokenWithUserResponse {
            tokens,
            user: user.into(),
        })
    }

    /// Exchanges a refresh token for a new pair; the old one is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let stored = self
            .refresh_tokens
            .find_by_hash(&hash_refresh_token(refresh_token))
            .await?
            .ok_or_else(AppError::invalid_token)?;

        if stored.revoked_at.is_some() {
            tracing::warn!("Revoked refresh token {} presented", stored.id);
            return Err(AppError::Unauthorized("Token has been revoked".into()));
        }
        if !stored.is_usable(Utc::now()) {
            return Err(AppError::invalid_token());
        }

        let user = self
            .users
            .find_by_id(stored.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(AppError::invalid_token)?;

        // a concurrent refresh may have spent it since the lookup
        if !self.refresh_tokens.revoke(stored.id).await? {
            return Err(AppError::Unauthorized("Token has been revoked".into()));
        }
        self.issue_tokens(&user).await
    }

    /// Unknown or already revoked tokens are ignored.
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        if let Some(stored) = self
            .refresh_tokens
            .find_by_hash(&hash_refresh_token(refresh_token))
            .await?
        {
            self.refresh_tokens.revoke(stored.id).await?;
        }
        Ok(())
    }

    /// Invalidates every access token (via token_version) and refresh token.
    pub async fn logout_all(&self, user: &User) -> Result<()> {
        self.users
            .increment_token_version(user.id)
            .await?
            .ok_or_else(|| AppError::user_not_found(user.id))?;
        let revoked = self.refresh_tokens.revoke_all_for_user(user.id).await?;
        tracing::info!("Logged out user {} everywhere ({} refresh tokens)", user.id, revoked);
        Ok(())
    }

    pub async fn change_password(&self, user: &User, data: PasswordChange) -> Result<()> {
        if !verify_password(&data.current_password, &user.hashed_password) {
            return Err(AppError::Unauthorized("Current password is incorrect".into()));
        }

        let hashed_password = hash_password(&data.new_password, self.config.bcrypt_cost)?;
        self.users
            .update(
                user.id,
                UserChanges {
                    hashed_password: Some(hashed_password),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::user_not_found(user.id))?;

        self.logout_all(user).await
    }
}
