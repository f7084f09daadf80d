//! Category endpoints.

use axum::{Extension, extract::Query, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    extract::{AppJson, AppPath, ListQuery},
    middleware::store::{StoreStaff, Viewer},
    models::category::Category,
    repositories::Entity,
    response::ApiResponse,
    state::AppState,
    validators::category::{self, ReqCategory},
};

/// Staff see their store's categories, everyone else those of active stores.
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Category>>, AppError> {
    let categories = state
        .categories
        .list(viewer.store_id(), query.page())
        .await
        .map_err(|e| e.into_app(Entity::Category))?;

    Ok(ApiResponse::ok(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppJson(request): AppJson<ReqCategory>,
) -> Result<ApiResponse<Category>, AppError> {
    let input = category::validate(request).map_err(AppError::validation(ErrorCode::CategoryDataInvalid))?;

    let category = Category::new(staff.store_id, input, Utc::now());
    state
        .categories
        .create(&category)
        .await
        .map_err(|e| e.into_app(Entity::Category))?;

    Ok(ApiResponse::created("Category created", category))
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(category_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqCategory>,
) -> Result<ApiResponse<Category>, AppError> {
    let input = category::validate(request).map_err(AppError::validation(ErrorCode::CategoryDataInvalid))?;

    let mut category = state
        .categories
        .get(staff.store_id, category_id)
        .await
        .map_err(|e| e.into_app(Entity::Category))?;

    category.apply(input, Utc::now());

    state
        .categories
        .update(&category)
        .await
        .map_err(|e| e.into_app(Entity::Category))?;

    Ok(ApiResponse::ok(category).with_title("Category updated"))
}

/// Products of a deleted category become uncategorised.
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(category_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .categories
        .delete(staff.store_id, category_id)
        .await
        .map_err(|e| e.into_app(Entity::Category))?;

    Ok(StatusCode::NO_CONTENT)
}
