// Repository layer: parameterized queries per entity.
// Services only see the traits, so handlers can run against PostgreSQL in
// production and against the in-memory store in tests.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::enums::Platform;
use crate::error::{AppError, Result};
use crate::models::{
    NewRefreshToken, NewUser, NewVideoEntry, RefreshToken, User, UserChanges, VideoEntry,
    VideoEntryChanges,
};

pub use postgres::PgRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Newest first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>>;

    async fn count(&self) -> Result<i64>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>>;

    /// Returns the new token version, or `None` when the user does not exist.
    async fn increment_token_version(&self, id: Uuid) -> Result<Option<i32>>;

    /// Hard delete. Video entries and refresh tokens go with the user.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait VideoEntryRepository: Send + Sync {
    async fn create(&self, entry: NewVideoEntry) -> Result<VideoEntry>;

    /// Only returns the entry when it belongs to `user_id`
    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<VideoEntry>>;

    /// Newest first
    async fn list_by_user(&self, user_id: Uuid, offset: i64, limit: i64)
    -> Result<Vec<VideoEntry>>;

    /// Ordered by video number
    async fn list_by_user_and_platform(
        &self,
        user_id: Uuid,
        platform: Platform,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VideoEntry>>;

    async fn count_by_user(&self, user_id: Uuid, platform: Option<Platform>) -> Result<i64>;

    async fn max_video_number(&self, user_id: Uuid, platform: Platform) -> Result<Option<i32>>;

    /// Next free number for the platform. Read-only: two callers racing on
    /// the same user and platform can be handed the same number.
    async fn next_video_number(&self, user_id: Uuid, platform: Platform) -> Result<i32> {
        self.max_video_number(user_id, platform)
            .await?
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| AppError::Conflict("No video numbers left for this platform".into()))
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: VideoEntryChanges,
    ) -> Result<Option<VideoEntry>>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken>;

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;

    async fn revoke(&self, id: Uuid) -> Result<bool>;

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64>;
}
