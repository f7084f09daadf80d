//! Coupon endpoints.
//!
//! Coupons are managed by store staff; shoppers only get the availability
//! check of a code, which never exposes usage counters.

use axum::{Extension, extract::Query, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    extract::{AppJson, AppPath, ListQuery},
    middleware::store::StoreStaff,
    models::coupon::{Coupon, CouponAvailability},
    repositories::Entity,
    response::ApiResponse,
    state::AppState,
    validators::coupon::{self, ReqCouponCreate, ReqCouponUpdate},
};

pub async fn list_coupons(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Coupon>>, AppError> {
    let coupons = state
        .coupons
        .list(staff.store_id, query.page())
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    Ok(ApiResponse::ok(coupons))
}

pub async fn get_coupon(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(coupon_id): AppPath<Uuid>,
) -> Result<ApiResponse<Coupon>, AppError> {
    let coupon = state
        .coupons
        .get(staff.store_id, coupon_id)
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    Ok(ApiResponse::ok(coupon))
}

/// Create a coupon; codes are unique within a store.
pub async fn create_coupon(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppJson(request): AppJson<ReqCouponCreate>,
) -> Result<ApiResponse<Coupon>, AppError> {
    let input = coupon::validate_create(request).map_err(AppError::validation(ErrorCode::CouponDataInvalid))?;

    let coupon = Coupon::new(staff.store_id, input, Utc::now());
    state
        .coupons
        .create(&coupon)
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    Ok(ApiResponse::created("Coupon created", coupon))
}

pub async fn update_coupon(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(coupon_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqCouponUpdate>,
) -> Result<ApiResponse<Coupon>, AppError> {
    let changes = coupon::validate_update(request).map_err(AppError::validation(ErrorCode::CouponDataInvalid))?;

    let mut coupon = state
        .coupons
        .get(staff.store_id, coupon_id)
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    coupon.apply(changes, Utc::now());
    coupon::check_merged(&coupon).map_err(AppError::validation(ErrorCode::CouponDataInvalid))?;

    state
        .coupons
        .update(&coupon)
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    Ok(ApiResponse::ok(coupon).with_title("Coupon updated"))
}

pub async fn delete_coupon(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(coupon_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .coupons
        .delete(staff.store_id, coupon_id)
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Public: can `code` be used at `store_id` right now?
pub async fn check_coupon(
    State(state): State<AppState>,
    AppPath((store_id, code)): AppPath<(Uuid, String)>,
) -> Result<ApiResponse<CouponAvailability>, AppError> {
    let coupon = state
        .coupons
        .find_by_code(store_id, code.trim())
        .await
        .map_err(|e| e.into_app(Entity::Coupon))?;

    Ok(ApiResponse::ok(CouponAvailability::of(&coupon, Utc::now())))
}
