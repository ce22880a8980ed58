use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::Config;
use crate::enums::TokenType;
use crate::error::{AppError, Result};

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(hash(password.as_bytes(), cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password.as_bytes(), hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,          // user id
    pub exp: i64,           // expiry
    pub iat: i64,           // issued at
    pub typ: TokenType,
    pub ver: i32,           // token_version at issue time
}

pub fn generate_access_token(
    user_id: Uuid,
    token_version: i32,
    config: &Config,
) -> Result<(String, i64)> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(
            config.access_token_expiration().as_secs() as i64,
        ))
        .ok_or_else(|| AppError::Internal("token expiry overflow".into()))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        exp: expiration,
        iat: now.timestamp(),
        typ: TokenType::Access,
        ver: token_version,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

    Ok((token, expiration))
}

/// Decodes and checks signature, expiry and token type.
pub fn verify_access_token(token: &str, config: &Config) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    if token_data.claims.typ != TokenType::Access {
        return Err(AppError::invalid_token());
    }

    Ok(token_data.claims)
}

/// Opaque refresh token handed to the client. Never stored as-is.
pub fn generate_refresh_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
