use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use video_planner::{
    AppState,
    config::Config,
    middleware::{RateLimiter, log_errors, rate_limit},
    repository::PgRepository,
    routes,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration (DATABASE_URL and JWT_SECRET are required)");
        e
    })?;

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'video_planner';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations applied");

    let state = AppState::new(config.clone(), PgRepository::new(pool));
    let router = routes::router(state).layer(axum::middleware::from_fn(log_errors));

    let router = match &config.redis_url {
        Some(url) => {
            let limiter = Arc::new(RateLimiter::new(redis::Client::open(url.as_str())?, &config));
            tracing::info!(
                "Rate limiting to {} requests per {}s",
                config.rate_limit_requests,
                config.rate_limit_window_secs
            );
            router.layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        }
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting disabled");
            router
        }
    };

    let router = router.layer(TraceLayer::new_for_http());

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}{}", addr, config.api_base_uri);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
