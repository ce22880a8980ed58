// Request and response bodies exchanged with clients

pub mod auth;
pub mod common;
pub mod user;
pub mod video;

pub use auth::*;
pub use common::*;
pub use user::*;
pub use video::*;
