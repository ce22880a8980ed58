use std::env;
use std::time::Duration;

pub const PAGINATION_DEFAULT_SIZE: u32 = 20;
pub const PAGINATION_MAX_SIZE: u32 = 100;

pub const EMAIL_MAX_LENGTH: u64 = 255;
pub const FULL_NAME_MAX_LENGTH: u64 = 255;
pub const PASSWORD_MIN_LENGTH: u64 = 8;
pub const PASSWORD_MAX_LENGTH: u64 = 128;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_expiration_secs: u64,
    pub refresh_token_expiration_secs: u64,
    pub bcrypt_cost: u32,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub youtube_description_max_length: usize,
}

fn var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        // minutes and days respectively
        let access_expiration: u64 = env::var("ACCESS_TOKEN_EXPIRATION")
            .ok()
            .and_then(|v| v.trim_end_matches('m').parse().ok())
            .unwrap_or(15);
        let refresh_expiration: u64 = env::var("REFRESH_TOKEN_EXPIRATION")
            .ok()
            .and_then(|v| v.trim_end_matches('d').parse().ok())
            .unwrap_or(7);

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET")?,
            access_token_expiration_secs: access_expiration * 60,
            refresh_token_expiration_secs: refresh_expiration * 24 * 3600,
            bcrypt_cost: var_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
            rate_limit_window_secs: var_or("RATE_LIMIT_WINDOW", 60),
            rate_limit_requests: var_or("RATE_LIMIT_REQUESTS", 100),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: var_or("SERVER_PORT", 3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/v1".into()),
            youtube_description_max_length: var_or("YOUTUBE_DESCRIPTION_MAX_LENGTH", 100),
        })
    }

    pub fn access_token_expiration(&self) -> Duration {
        Duration::from_secs(self.access_token_expiration_secs)
    }

    pub fn refresh_token_expiration(&self) -> Duration {
        Duration::from_secs(self.refresh_token_expiration_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/video_planner_test".into(),
            redis_url: None,
            jwt_secret: "test-secret".into(),
            access_token_expiration_secs: 900,
            refresh_token_expiration_secs: 7 * 24 * 3600,
            bcrypt_cost: 4,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            server_host: "127.0.0.1".into(),
            server_port: 0,
            api_base_uri: "/v1".into(),
            youtube_description_max_length: 100,
        }
    }
}
