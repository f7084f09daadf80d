//! Health check endpoint for service monitoring.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, repositories::Entity, response::ApiResponse, state::AppState};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "data": {
///     "status": "healthy",
///     "database": "connected",
///     "timestamp": "2025-12-21T19:00:00Z"
///   }
/// }
/// ```
///
/// If the database is unreachable the standard 500 envelope is returned.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<ApiResponse<HealthResponse>, AppError> {
    state
        .platform
        .ping()
        .await
        .map_err(|e| e.into_app(Entity::Settings))?;

    Ok(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
