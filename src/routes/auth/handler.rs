use axum::{
    extract::{Json, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    extract::{ValidatedForm, ValidatedJson},
    middleware::CurrentUser,
    schema::{
        LoginForm, PasswordChange, RefreshRequest, TokenResponse, TokenWithUserResponse,
        UserResponse,
    },
};

/// Form-encoded login; `username` is the email address.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> Result<Json<TokenWithUserResponse>> {
    let response = state
        .auth_service()
        .login(&form.username, &form.password)
        .await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenResponse>> {
    let tokens = state.auth_service().refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<StatusCode> {
    state.auth_service().logout(&req.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn logout_all(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    state.auth_service().logout_all(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = AppState)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<PasswordChange>,
) -> Result<StatusCode> {
    state.auth_service().change_password(&user, req).await?;
    Ok(StatusCode::NO_CONTENT)
}
