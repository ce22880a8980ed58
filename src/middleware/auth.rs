use std::marker::PhantomData;

use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::AppState;
use crate::enums::UserRole;
use crate::error::AppError;
use crate::models::User;
use crate::repository::UserRepository;
use crate::utils::verify_access_token;

/// The authenticated user behind the request's bearer token.
///
/// Rejects with 401 when the header is missing, the token does not verify,
/// the user is gone or inactive, or the token predates the user's last
/// `logout-all` (its `ver` no longer matches `token_version`).
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // already resolved by an earlier extractor on this request
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized("Missing bearer token".into()))?;

        let claims = verify_access_token(bearer.token(), &state.config)?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("User account is inactive".into()));
        }
        if user.token_version != claims.ver {
            tracing::debug!("Stale token version for user {}", user.id);
            return Err(AppError::Unauthorized("Token has been revoked".into()));
        }

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// A set of roles allowed through [`RequireRole`].
pub trait RoleSet: Send + Sync + 'static {
    const ALLOWED: &'static [UserRole];

    fn permits(role: UserRole) -> bool {
        Self::ALLOWED.contains(&role)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl RoleSet for Admin {
    const ALLOWED: &'static [UserRole] = &[UserRole::Admin];
}

/// [`CurrentUser`] whose role is in `R::ALLOWED`, 403 otherwise.
/// Put it before any body extractor so the check runs first.
#[derive(Debug, Clone)]
pub struct RequireRole<R: RoleSet>(pub User, PhantomData<R>);

pub type AdminOnly = RequireRole<Admin>;

impl<R: RoleSet> FromRequestParts<AppState> for RequireRole<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !R::permits(user.role) {
            tracing::info!("User {} denied, role {:?}", user.id, user.role);
            return Err(AppError::Forbidden("Insufficient permissions".into()));
        }
        Ok(RequireRole(user, PhantomData))
    }
}
