use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::enums::Platform;

/// Video entry for social media content management
#[derive(Debug, Clone, FromRow)]
pub struct VideoEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    pub video_number: i32,
    pub description: String,
    pub youtube_description: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewVideoEntry {
    pub user_id: Uuid,
    pub platform: Platform,
    pub video_number: i32,
    pub description: String,
    pub youtube_description: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// Partial update. Nullable columns use a nested option so an explicit null
/// can clear them.
#[derive(Debug, Clone, Default)]
pub struct VideoEntryChanges {
    pub description: Option<String>,
    pub video_number: Option<i32>,
    pub youtube_description: Option<Option<String>>,
    pub scheduled_time: Option<Option<DateTime<Utc>>>,
}

impl VideoEntryChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.video_number.is_none()
            && self.youtube_description.is_none()
            && self.scheduled_time.is_none()
    }
}
