use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginatedResponse, PaginationQuery, default_page, default_size, deserialize_some};
use crate::config::PAGINATION_MAX_SIZE;
use crate::enums::Platform;
use crate::models::{VideoEntry, VideoEntryChanges};

#[derive(Debug, Deserialize, Validate)]
pub struct VideoEntryCreate {
    pub platform: Platform,
    /// 0 picks the next free number for the platform
    #[serde(default)]
    #[validate(range(min = 0))]
    pub video_number: i32,
    #[serde(default)]
    pub description: String,
    pub youtube_description: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// Only fields present in the body are applied. `null` clears the nullable
/// fields and is ignored for the others.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct VideoEntryUpdate {
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub video_number: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub youtube_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub scheduled_time: Option<Option<DateTime<Utc>>>,
}

impl From<VideoEntryUpdate> for VideoEntryChanges {
    fn from(update: VideoEntryUpdate) -> Self {
        Self {
            description: update.description,
            video_number: update.video_number,
            youtube_description: update.youtube_description,
            scheduled_time: update.scheduled_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEntryResponse {
    pub id: Uuid,
    pub platform: Platform,
    pub video_number: i32,
    pub description: String,
    pub youtube_description: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VideoEntry> for VideoEntryResponse {
    fn from(entry: VideoEntry) -> Self {
        Self {
            id: entry.id,
            platform: entry.platform,
            video_number: entry.video_number,
            description: entry.description,
            youtube_description: entry.youtube_description,
            scheduled_time: entry.scheduled_time,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

pub type VideoEntryListResponse = PaginatedResponse<VideoEntryResponse>;

#[derive(Debug, Deserialize, Validate)]
pub struct CopyToTargetRequest {
    pub target_platform: Platform,
    #[serde(default = "default_shorten")]
    pub shorten_for_youtube: bool,
}

fn default_shorten() -> bool {
    true
}

// page/size are repeated here rather than flattened: urlencoded numbers do
// not survive #[serde(flatten)]
#[derive(Debug, Deserialize, Validate)]
pub struct ListVideosQuery {
    pub platform: Option<Platform>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = PAGINATION_MAX_SIZE))]
    pub size: u32,
}

impl ListVideosQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            size: self.size,
        }
    }
}
