//! Platform settings endpoints.
//!
//! - GET /v1/settings - public
//! - PATCH /v1/settings - admin only

use axum::extract::State;
use chrono::Utc;

use crate::{
    error::{AppError, ErrorCode},
    extract::AppJson,
    models::settings::Settings,
    repositories::Entity,
    response::ApiResponse,
    state::AppState,
    validators::settings::{self, ReqSettingsUpdate},
};

pub async fn get_settings(State(state): State<AppState>) -> Result<ApiResponse<Settings>, AppError> {
    let settings = state
        .platform
        .settings()
        .await
        .map_err(|e| e.into_app(Entity::Settings))?;

    Ok(ApiResponse::ok(settings))
}

/// Partial update; absent fields keep their value.
pub async fn update_settings(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReqSettingsUpdate>,
) -> Result<ApiResponse<Settings>, AppError> {
    let changes = settings::validate(request).map_err(AppError::validation(ErrorCode::SettingsDataInvalid))?;

    let settings = state
        .platform
        .update_settings(changes, Utc::now())
        .await
        .map_err(|e| e.into_app(Entity::Settings))?;

    tracing::info!("platform settings updated");

    Ok(ApiResponse::ok(settings).with_title("Settings updated"))
}
