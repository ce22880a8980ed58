use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RefreshTokenRepository, UserRepository, VideoEntryRepository};
use crate::enums::{Platform, StoredEnum};
use crate::error::Result;
use crate::models::{
    NewRefreshToken, NewUser, NewVideoEntry, RefreshToken, User, UserChanges, VideoEntry,
    VideoEntryChanges,
};

/// PostgreSQL-backed implementation of every repository trait
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, hashed_password, full_name, is_active, is_verified, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, email, hashed_password, full_name, is_active, is_verified,
                role, token_version, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.role.encode())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, email, hashed_password, full_name, is_active, is_verified,
                role, token_version, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, email, hashed_password, full_name, is_active, is_verified,
                role, token_version, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, email, hashed_password, full_name, is_active, is_verified,
                role, token_version, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                hashed_password = COALESCE($3, hashed_password),
                full_name = CASE WHEN $4 THEN $5 ELSE full_name END,
                is_active = COALESCE($6, is_active),
                is_verified = COALESCE($7, is_verified),
                role = COALESCE($8, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, email, hashed_password, full_name, is_active, is_verified,
                role, token_version, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.hashed_password)
        .bind(changes.full_name.is_some())
        .bind(changes.full_name.flatten())
        .bind(changes.is_active)
        .bind(changes.is_verified)
        .bind(changes.role.map(StoredEnum::encode))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn increment_token_version(&self, id: Uuid) -> Result<Option<i32>> {
        let version: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET token_version = token_version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING token_version
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(version)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl VideoEntryRepository for PgRepository {
    async fn create(&self, entry: NewVideoEntry) -> Result<VideoEntry> {
        let entry = sqlx::query_as::<_, VideoEntry>(
            r#"
            INSERT INTO video_entries (
                id, user_id, platform, video_number,
                description, youtube_description, scheduled_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, user_id, platform, video_number, description,
                youtube_description, scheduled_time, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(entry.platform.encode())
        .bind(entry.video_number)
        .bind(&entry.description)
        .bind(&entry.youtube_description)
        .bind(entry.scheduled_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<VideoEntry>> {
        let entry = sqlx::query_as::<_, VideoEntry>(
            r#"
            SELECT
                id, user_id, platform, video_number, description,
                youtube_description, scheduled_time, created_at, updated_at
            FROM video_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VideoEntry>> {
        let entries = sqlx::query_as::<_, VideoEntry>(
            r#"
            SELECT
                id, user_id, platform, video_number, description,
                youtube_description, scheduled_time, created_at, updated_at
            FROM video_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn list_by_user_and_platform(
        &self,
        user_id: Uuid,
        platform: Platform,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VideoEntry>> {
        let entries = sqlx::query_as::<_, VideoEntry>(
            r#"
            SELECT
                id, user_id, platform, video_number, description,
                youtube_description, scheduled_time, created_at, updated_at
            FROM video_entries
            WHERE user_id = $1 AND platform = $2
            ORDER BY video_number ASC
            OFFSET $3
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(platform.encode())
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn count_by_user(&self, user_id: Uuid, platform: Option<Platform>) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM video_entries
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR platform = $2)
            "#,
        )
        .bind(user_id)
        .bind(platform.map(StoredEnum::encode))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn max_video_number(&self, user_id: Uuid, platform: Platform) -> Result<Option<i32>> {
        let max: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT MAX(video_number)
            FROM video_entries
            WHERE user_id = $1 AND platform = $2
            "#,
        )
        .bind(user_id)
        .bind(platform.encode())
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: VideoEntryChanges,
    ) -> Result<Option<VideoEntry>> {
        let entry = sqlx::query_as::<_, VideoEntry>(
            r#"
            UPDATE video_entries
            SET
                description = COALESCE($3, description),
                video_number = COALESCE($4, video_number),
                youtube_description = CASE WHEN $5 THEN $6 ELSE youtube_description END,
                scheduled_time = CASE WHEN $7 THEN $8 ELSE scheduled_time END,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING
                id, user_id, platform, video_number, description,
                youtube_description, scheduled_time, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.description)
        .bind(changes.video_number)
        .bind(changes.youtube_description.is_some())
        .bind(changes.youtube_description.flatten())
        .bind(changes.scheduled_time.is_some())
        .bind(changes.scheduled_time.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM video_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token_hash, expires_at, revoked_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT id, user_id, token_hash, expires_at, revoked_at, created_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn revoke(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
