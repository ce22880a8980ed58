pub mod admin;
pub mod auth;
pub mod user;
pub mod video;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Every API route, relative to the configured base URI. Auth and role
/// checks happen in the handlers' extractors.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // auth
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/logout-all", post(auth::logout_all))
        .route("/auth/me", get(auth::me))
        .route("/auth/change-password", post(auth::change_password))
        // users
        .route("/users", post(user::register))
        .route("/users/me", get(user::get_me).patch(user::update_me))
        // admin
        .route(
            "/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/admin/users/{id}",
            get(admin::get_user)
                .patch(admin::update_user)
                .delete(admin::delete_user),
        )
        // videos
        .route(
            "/videos",
            post(video::create_video).get(video::list_videos),
        )
        .route(
            "/videos/{id}",
            get(video::get_video)
                .patch(video::update_video)
                .delete(video::delete_video),
        )
        .route("/videos/{id}/copy", post(video::copy_video))
}

/// Mounts [`api_routes`] under `config.api_base_uri` and attaches state.
pub fn router(state: AppState) -> Router {
    let base = format!("/{}", state.config.api_base_uri.trim_matches('/'));
    let router = if base == "/" {
        Router::new().merge(api_routes())
    } else {
        Router::new().nest(&base, api_routes())
    };
    router.with_state(state)
}
