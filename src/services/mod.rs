// Business logic between the route handlers and the repositories

pub mod auth;
pub mod user;
pub mod video;

pub use auth::AuthService;
pub use user::UserService;
pub use video::{VideoEntryService, shorten_description};

/// Emails are compared case-insensitively and without surrounding spaces
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
