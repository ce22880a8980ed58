use std::sync::Arc;

use config::Config;
use repository::{RefreshTokenRepository, UserRepository, VideoEntryRepository};
use services::{AuthService, UserService, VideoEntryService};

pub mod config;
pub mod enums;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    pub videos: Arc<dyn VideoEntryRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

impl AppState {
    /// Shares one storage backend across all repository roles.
    pub fn new<R>(config: Config, repository: R) -> Self
    where
        R: UserRepository + VideoEntryRepository + RefreshTokenRepository + 'static,
    {
        let repository = Arc::new(repository);
        Self {
            config,
            users: repository.clone(),
            videos: repository.clone(),
            refresh_tokens: repository,
        }
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.users.clone(), self.config.bcrypt_cost)
    }

    pub fn video_service(&self) -> VideoEntryService {
        VideoEntryService::new(
            self.videos.clone(),
            self.config.youtube_description_max_length,
        )
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.users.clone(),
            self.refresh_tokens.clone(),
            self.config.clone(),
        )
    }
}
