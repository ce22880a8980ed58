use std::sync::Arc;

use uuid::Uuid;

use crate::enums::{Platform, StoredEnum};
use crate::error::{AppError, Result};
use crate::models::{NewVideoEntry, VideoEntryChanges};
use crate::repository::VideoEntryRepository;
use crate::schema::{
    PaginatedResponse, PaginationQuery, VideoEntryCreate, VideoEntryListResponse,
    VideoEntryResponse, VideoEntryUpdate,
};

const ELLIPSIS: &str = "...";

fn entry_not_found() -> AppError {
    AppError::NotFound("Video entry not found".into())
}

/// Business logic for video entry operations. Every call is scoped to the
/// owning user; entries of other users behave as missing.
#[derive(Clone)]
pub struct VideoEntryService {
    videos: Arc<dyn VideoEntryRepository>,
    youtube_description_max_length: usize,
}

impl VideoEntryService {
    pub fn new(videos: Arc<dyn VideoEntryRepository>, youtube_description_max_length: usize) -> Self {
        Self {
            videos,
            youtube_description_max_length,
        }
    }

    pub async fn create_entry(
        &self,
        user_id: Uuid,
        data: VideoEntryCreate,
    ) -> Result<VideoEntryResponse> {
        let video_number = match data.video_number {
            0 => self.videos.next_video_number(user_id, data.platform).await?,
            n => n,
        };

        let entry = self
            .videos
            .create(NewVideoEntry {
                user_id,
                platform: data.platform,
                video_number,
                description: data.description,
                youtube_description: data.youtube_description,
                scheduled_time: data.scheduled_time,
            })
            .await?;

        tracing::info!(
            "Created video entry {} ({} #{}) for user {}",
            entry.id,
            entry.platform.value(),
            entry.video_number,
            user_id
        );
        Ok(entry.into())
    }

    pub async fn get_entry(&self, entry_id: Uuid, user_id: Uuid) -> Result<VideoEntryResponse> {
        self.videos
            .find_by_id_and_user(entry_id, user_id)
            .await?
            .map(Into::into)
            .ok_or_else(entry_not_found)
    }

    pub async fn update_entry(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        data: VideoEntryUpdate,
    ) -> Result<VideoEntryResponse> {
        let changes: VideoEntryChanges = data.into();
        if changes.is_empty() {
            return self.get_entry(entry_id, user_id).await;
        }
        self.videos
            .update(entry_id, user_id, changes)
            .await?
            .map(Into::into)
            .ok_or_else(entry_not_found)
    }

    pub async fn delete_entry(&self, entry_id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.videos.delete(entry_id, user_id).await? {
            return Err(entry_not_found());
        }
        tracing::info!("Deleted video entry {} for user {}", entry_id, user_id);
        Ok(())
    }

    pub async fn list_entries(
        &self,
        user_id: Uuid,
        platform: Option<Platform>,
        pagination: PaginationQuery,
    ) -> Result<VideoEntryListResponse> {
        let (offset, limit) = (pagination.offset(), pagination.limit());
        let entries = match platform {
            Some(platform) => {
                self.videos
                    .list_by_user_and_platform(user_id, platform, offset, limit)
                    .await?
            }
            None => self.videos.list_by_user(user_id, offset, limit).await?,
        };
        let total = self.videos.count_by_user(user_id, platform).await?;

        Ok(PaginatedResponse {
            items: entries.into_iter().map(Into::into).collect(),
            total,
            page: pagination.page,
            size: pagination.size,
        })
    }

    /// Duplicates an entry onto another platform under the next free number.
    /// Copies to YouTube reuse the source's YouTube text, or else shorten the
    /// description, unless `shorten_for_youtube` is off.
    pub async fn copy_to_platform(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        target_platform: Platform,
        shorten_for_youtube: bool,
    ) -> Result<VideoEntryResponse> {
        let source = self
            .videos
            .find_by_id_and_user(entry_id, user_id)
            .await?
            .ok_or_else(entry_not_found)?;

        let next_number = self.videos.next_video_number(user_id, target_platform).await?;

        let mut description = source.description;
        let mut youtube_description = None;
        if target_platform == Platform::Youtube && shorten_for_youtube {
            let short = source
                .youtube_description
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| {
                    shorten_description(&description, self.youtube_description_max_length)
                });
            description = short.clone();
            youtube_description = Some(short);
        }

        let entry = self
            .videos
            .create(NewVideoEntry {
                user_id,
                platform: target_platform,
                video_number: next_number,
                description,
                youtube_description,
                scheduled_time: source.scheduled_time,
            })
            .await?;

        tracing::info!(
            "Copied video entry {} to {} as {}",
            entry_id,
            target_platform.value(),
            entry.id
        );
        Ok(entry.into())
    }
}

/// Fits `text` into `max_length` characters for YouTube Shorts: cut at the
/// last whitespace before the limit and append an ellipsis.
pub fn shorten_description(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    // no room for an ellipsis
    if max_length < ELLIPSIS.len() {
        return text.chars().take(max_length).collect();
    }

    let budget = max_length - ELLIPSIS.len();
    let cut = text
        .char_indices()
        .nth(budget)
        .map_or(text.len(), |(idx, _)| idx);
    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(idx) => &head[..idx],
        None => head,
    };

    format!("{}{}", head.trim_end(), ELLIPSIS)
}
