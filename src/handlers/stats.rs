//! Reporting endpoints.
//!
//! - GET /v1/stats/products - top products by number of orders
//! - GET /v1/stats/categories - top categories by number of products
//! - GET /v1/stats/orders?timeline=w|m|y - store order report, staff only

use axum::{Extension, extract::Query, extract::State};
use chrono::Utc;

use crate::{
    error::{AppError, ErrorCode},
    extract::StatsQuery,
    middleware::store::{StoreStaff, Viewer},
    models::{category::CategoryStats, product::ProductStats},
    repositories::{Entity, STATS_LIMIT},
    response::ApiResponse,
    services::stats::{self, OrderStatsReport, Timeline},
    state::AppState,
};

/// Staff rank their own store's products, the public ranks published
/// products of active stores.
pub async fn product_stats(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<ApiResponse<Vec<ProductStats>>, AppError> {
    let stats = state
        .products
        .stats(viewer.store_id(), STATS_LIMIT)
        .await
        .map_err(|e| e.into_app(Entity::Product))?;

    Ok(ApiResponse::ok(stats))
}

pub async fn category_stats(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<ApiResponse<Vec<CategoryStats>>, AppError> {
    let stats = state
        .categories
        .stats(viewer.store_id(), STATS_LIMIT)
        .await
        .map_err(|e| e.into_app(Entity::Category))?;

    Ok(ApiResponse::ok(stats))
}

/// Order report of the caller's store.
///
/// # Flow
///
/// 1. Resolve the timeline (`w` when absent, anything unknown is a 422)
/// 2. Capture "now" once and derive every bucket from it
/// 3. Load the all-time summary and the order rows of the whole window
/// 4. Distribute the rows over the buckets
pub async fn order_stats(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    Query(query): Query<StatsQuery>,
) -> Result<ApiResponse<OrderStatsReport>, AppError> {
    let selector = query.timeline.as_deref().map(str::trim).unwrap_or("w");
    let timeline = Timeline::parse(selector).ok_or_else(|| {
        AppError::invalid_field(ErrorCode::StatsQueryInvalid, "timeline", "timeline must be one of w, m, y")
    })?;

    let now = Utc::now();
    let buckets = stats::buckets(timeline, now);
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return Err(AppError::Internal("timeline without buckets".to_string()));
    };

    let summary = state
        .orders
        .summary(staff.store_id)
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    let rows = state
        .orders
        .stat_rows(staff.store_id, first.start, last.end)
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    Ok(ApiResponse::ok(stats::aggregate(summary, &buckets, &rows)))
}
