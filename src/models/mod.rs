// Database entities and the change sets used to write them

pub mod refresh_token;
pub mod user;
pub mod video;

pub use refresh_token::{NewRefreshToken, RefreshToken};
pub use user::{NewUser, User, UserChanges};
pub use video::{NewVideoEntry, VideoEntry, VideoEntryChanges};
