use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::config::{PAGINATION_DEFAULT_SIZE, PAGINATION_MAX_SIZE};

/// Paginated list body
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

/// `?page=&size=` query parameters
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = PAGINATION_MAX_SIZE))]
    pub size: u32,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PaginationQuery {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_size() -> u32 {
    PAGINATION_DEFAULT_SIZE
}

/// Tells an explicit `null` (`Some(None)`) apart from a missing field
/// (`None`) in PATCH bodies. Use with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
