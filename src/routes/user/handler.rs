use axum::{
    extract::{Json, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    extract::ValidatedJson,
    middleware::CurrentUser,
    schema::{UserCreate, UserResponse, UserUpdate},
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service().register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler(state = AppState)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

#[axum::debug_handler]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<UserUpdate>,
) -> Result<Json<UserResponse>> {
    let user = state.user_service().update_me(&user, req).await?;
    Ok(Json(user))
}
