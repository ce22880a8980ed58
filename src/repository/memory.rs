use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RefreshTokenRepository, UserRepository, VideoEntryRepository};
use crate::enums::Platform;
use crate::error::{AppError, Result};
use crate::models::{
    NewRefreshToken, NewUser, NewVideoEntry, RefreshToken, User, UserChanges, VideoEntry,
    VideoEntryChanges,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    videos: Vec<VideoEntry>,
    refresh_tokens: Vec<RefreshToken>,
}

/// In-memory stand-in for PostgreSQL, mirroring its unique email
/// constraint and `ON DELETE CASCADE` foreign keys.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

fn page<T: Clone>(rows: Vec<&T>, offset: i64, limit: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Resource already exists".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            hashed_password: user.hashed_password,
            full_name: user.full_name,
            is_active: user.is_active,
            is_verified: user.is_verified,
            role: user.role,
            token_version: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<&User> = tables.users.values().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(users, offset, limit))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.read().await.users.len() as i64)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict("Resource already exists".into()));
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hashed_password) = changes.hashed_password {
            user.hashed_password = hashed_password;
        }
        if let Some(full_name) = changes.full_name {
            user.full_name = full_name;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(is_verified) = changes.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Some(Utc::now());
        Ok(Some(user.clone()))
    }

    async fn increment_token_version(&self, id: Uuid) -> Result<Option<i32>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.token_version += 1;
            user.token_version
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.videos.retain(|v| v.user_id != id);
        tables.refresh_tokens.retain(|t| t.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl VideoEntryRepository for MemoryRepository {
    async fn create(&self, entry: NewVideoEntry) -> Result<VideoEntry> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&entry.user_id) {
            return Err(AppError::Internal("video entry references a missing user".into()));
        }

        let entry = VideoEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            platform: entry.platform,
            video_number: entry.video_number,
            description: entry.description,
            youtube_description: entry.youtube_description,
            scheduled_time: entry.scheduled_time,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.videos.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<VideoEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .videos
            .iter()
            .find(|v| v.id == id && v.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VideoEntry>> {
        let tables = self.tables.read().await;
        // insertion order stands in for created_at
        let entries: Vec<&VideoEntry> =
            tables.videos.iter().rev().filter(|v| v.user_id == user_id).collect();
        Ok(page(entries, offset, limit))
    }

    async fn list_by_user_and_platform(
        &self,
        user_id: Uuid,
        platform: Platform,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VideoEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<&VideoEntry> = tables
            .videos
            .iter()
            .filter(|v| v.user_id == user_id && v.platform == platform)
            .collect();
        entries.sort_by_key(|v| v.video_number);
        Ok(page(entries, offset, limit))
    }

    async fn count_by_user(&self, user_id: Uuid, platform: Option<Platform>) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .videos
            .iter()
            .filter(|v| v.user_id == user_id && platform.is_none_or(|p| v.platform == p))
            .count() as i64)
    }

    async fn max_video_number(&self, user_id: Uuid, platform: Platform) -> Result<Option<i32>> {
        let tables = self.tables.read().await;
        Ok(tables
            .videos
            .iter()
            .filter(|v| v.user_id == user_id && v.platform == platform)
            .map(|v| v.video_number)
            .max())
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: VideoEntryChanges,
    ) -> Result<Option<VideoEntry>> {
        let mut tables = self.tables.write().await;
        let Some(entry) = tables
            .videos
            .iter_mut()
            .find(|v| v.id == id && v.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(description) = changes.description {
            entry.description = description;
        }
        if let Some(video_number) = changes.video_number {
            entry.video_number = video_number;
        }
        if let Some(youtube_description) = changes.youtube_description {
            entry.youtube_description = youtube_description;
        }
        if let Some(scheduled_time) = changes.scheduled_time {
            entry.scheduled_time = scheduled_time;
        }
        entry.updated_at = Some(Utc::now());
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.videos.len();
        tables.videos.retain(|v| !(v.id == id && v.user_id == user_id));
        Ok(tables.videos.len() < before)
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        let token = RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };
        self.tables.write().await.refresh_tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let tables = self.tables.read().await;
        Ok(tables
            .refresh_tokens
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .refresh_tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut revoked = 0;
        for token in tables
            .refresh_tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && t.revoked_at.is_none())
        {
            token.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }
}
