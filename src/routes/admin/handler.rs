use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::Result,
    extract::{ValidatedJson, ValidatedPath, ValidatedQuery},
    middleware::AdminOnly,
    schema::{AdminUserCreate, PaginationQuery, UserListResponse, UserResponse, UserUpdateAdmin},
};

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminOnly,
    ValidatedQuery(pagination): ValidatedQuery<PaginationQuery>,
) -> Result<Json<UserListResponse>> {
    let page = state.user_service().list_users(pagination).await?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    _admin: AdminOnly,
    ValidatedJson(req): ValidatedJson<AdminUserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service().admin_create_user(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminOnly,
    ValidatedPath(user_id): ValidatedPath<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state.user_service().get_user_by_id(user_id).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminOnly,
    ValidatedPath(user_id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UserUpdateAdmin>,
) -> Result<Json<UserResponse>> {
    let user = state.user_service().admin_update_user(user_id, req).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminOnly,
    ValidatedPath(user_id): ValidatedPath<Uuid>,
) -> Result<StatusCode> {
    state.user_service().admin_delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
