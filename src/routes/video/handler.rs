use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::Result,
    extract::{ValidatedJson, ValidatedPath, ValidatedQuery},
    middleware::CurrentUser,
    schema::{
        CopyToTargetRequest, ListVideosQuery, VideoEntryCreate, VideoEntryListResponse,
        VideoEntryResponse, VideoEntryUpdate,
    },
};

#[axum::debug_handler]
pub async fn create_video(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<VideoEntryCreate>,
) -> Result<(StatusCode, Json<VideoEntryResponse>)> {
    let entry = state.video_service().create_entry(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[axum::debug_handler]
pub async fn list_videos(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<ListVideosQuery>,
) -> Result<Json<VideoEntryListResponse>> {
    let page = state
        .video_service()
        .list_entries(user.id, query.platform, query.pagination())
        .await?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn get_video(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedPath(entry_id): ValidatedPath<Uuid>,
) -> Result<Json<VideoEntryResponse>> {
    let entry = state.video_service().get_entry(entry_id, user.id).await?;
    Ok(Json(entry))
}

#[axum::debug_handler]
pub async fn update_video(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedPath(entry_id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<VideoEntryUpdate>,
) -> Result<Json<VideoEntryResponse>> {
    let entry = state
        .video_service()
        .update_entry(entry_id, user.id, req)
        .await?;
    Ok(Json(entry))
}

#[axum::debug_handler]
pub async fn delete_video(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedPath(entry_id): ValidatedPath<Uuid>,
) -> Result<StatusCode> {
    state.video_service().delete_entry(entry_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Duplicates an entry onto another platform under its next number.
#[axum::debug_handler]
pub async fn copy_video(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedPath(entry_id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<CopyToTargetRequest>,
) -> Result<(StatusCode, Json<VideoEntryResponse>)> {
    let entry = state
        .video_service()
        .copy_to_platform(entry_id, user.id, req.target_platform, req.shorten_for_youtube)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
