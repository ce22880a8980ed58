use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stored string matches no member and the enum has no fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {enum_name}")]
pub struct EnumLookupError {
    pub enum_name: &'static str,
    pub value: String,
}

/// Enums persisted by their value string rather than by their Rust name.
///
/// Renaming a variant never changes what is written to the database, and a
/// stored value that no longer maps to a variant decodes to `UNKNOWN` when the
/// enum declares one.
pub trait StoredEnum: Sized + Copy + 'static {
    const NAME: &'static str;
    const MEMBERS: &'static [Self];
    const UNKNOWN: Option<Self> = None;

    fn value(self) -> &'static str;

    fn encode(self) -> &'static str {
        self.value()
    }

    fn decode(stored: &str) -> Result<Self, EnumLookupError> {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|member| member.value() == stored)
            .or(Self::UNKNOWN)
            .ok_or_else(|| EnumLookupError {
                enum_name: Self::NAME,
                value: stored.to_string(),
            })
    }
}

/// User roles for authorization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Unknown,
    #[default]
    User,
    Admin,
}

impl StoredEnum for UserRole {
    const NAME: &'static str = "UserRole";
    const MEMBERS: &'static [Self] = &[Self::Unknown, Self::User, Self::Admin];
    const UNKNOWN: Option<Self> = Some(Self::Unknown);

    fn value(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = EnumLookupError;

    fn try_from(stored: String) -> Result<Self, Self::Error> {
        Self::decode(&stored)
    }
}

/// Social media platforms a video entry is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Instagram,
    Youtube,
}

impl StoredEnum for Platform {
    const NAME: &'static str = "Platform";
    const MEMBERS: &'static [Self] = &[Self::Tiktok, Self::Instagram, Self::Youtube];

    fn value(self) -> &'static str {
        match self {
            Self::Tiktok => "tiktok",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = EnumLookupError;

    fn try_from(stored: String) -> Result<Self, Self::Error> {
        Self::decode(&stored)
    }
}

/// JWT token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}
