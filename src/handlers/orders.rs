//! Order endpoints.
//!
//! Shoppers place and read their own orders; store staff read their
//! store's orders and move them through the status workflow.

use axum::{Extension, extract::Query, extract::State};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    extract::{AppJson, AppPath, ListQuery},
    middleware::{auth::AuthContext, store::StoreStaff},
    models::order::{Order, OrderDetails},
    repositories::Entity,
    response::ApiResponse,
    state::AppState,
    validators::order::{self, ReqOrderCreate, ReqOrderStatus, ReqPaymentStatus},
};

/// Place an order.
///
/// Prices, stock and the coupon are re-read under lock; the client only
/// sends product ids and quantities.
///
/// # Request Body
///
/// ```json
/// {
///   "items": [{"id": "550e8400-e29b-41d4-a716-446655440000", "quantity": 2}],
///   "billing_address_id": "addr-1",
///   "payment_method_id": "cod",
///   "coupon_code": "SPRING10"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: order with its items
/// - **422**: `order_data_invalid`; `items` for unknown products, products
///   of several stores or insufficient stock, `coupon_code` for an unusable
///   coupon. Nothing is written in that case.
pub async fn place_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(request): AppJson<ReqOrderCreate>,
) -> Result<ApiResponse<OrderDetails>, AppError> {
    let placement = order::validate_create(request).map_err(AppError::validation(ErrorCode::OrderDataInvalid))?;

    let details = state
        .orders
        .place(auth.user_id, &placement, Utc::now())
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    Ok(ApiResponse::created("Order placed", details))
}

pub async fn list_own_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Order>>, AppError> {
    let orders = state
        .orders
        .list_for_user(auth.user_id, query.page())
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    Ok(ApiResponse::ok(orders))
}

pub async fn get_own_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(order_id): AppPath<Uuid>,
) -> Result<ApiResponse<OrderDetails>, AppError> {
    let details = state
        .orders
        .get_for_user(auth.user_id, order_id)
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    Ok(ApiResponse::ok(details))
}

pub async fn list_store_orders(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Order>>, AppError> {
    let orders = state
        .orders
        .list_for_store(staff.store_id, query.page())
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    Ok(ApiResponse::ok(orders))
}

pub async fn get_store_order(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(order_id): AppPath<Uuid>,
) -> Result<ApiResponse<OrderDetails>, AppError> {
    let details = state
        .orders
        .get_for_store(staff.store_id, order_id)
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    Ok(ApiResponse::ok(details))
}

/// Delivered and cancelled orders keep their status.
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(order_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqOrderStatus>,
) -> Result<ApiResponse<Order>, AppError> {
    let status = order::validate_status(request).map_err(AppError::validation(ErrorCode::OrderDataInvalid))?;

    let order = state
        .orders
        .update_status(staff.store_id, order_id, status, Utc::now())
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    tracing::info!(order_id = %order.id, status = ?order.status, "order status changed");

    Ok(ApiResponse::ok(order).with_title("Order status updated"))
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(order_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqPaymentStatus>,
) -> Result<ApiResponse<Order>, AppError> {
    let payment_status =
        order::validate_payment_status(request).map_err(AppError::validation(ErrorCode::OrderDataInvalid))?;

    let order = state
        .orders
        .update_payment_status(staff.store_id, order_id, payment_status, Utc::now())
        .await
        .map_err(|e| e.into_app(Entity::Order))?;

    tracing::info!(order_id = %order.id, payment_status = ?order.payment_status, "payment status changed");

    Ok(ApiResponse::ok(order).with_title("Payment status updated"))
}
