//! HTTP router.
//!
//! Routes are grouped by the access they need; each group carries its own
//! middleware stack:
//!
//! ```text
//! public      no middleware
//! catalogue   identify_viewer                         (staff or public view)
//! user        authenticate
//! staff       authenticate → require_store_staff
//! admin       authenticate → require_admin
//! ```

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, ErrorCode},
    handlers::{categories, coupons, files, health, orders, products, settings, stats, stores, users},
    middleware::{auth, store},
    response::platform_headers,
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/v1/settings", get(settings::get_settings))
        .route("/v1/users/register", post(users::register))
        .route("/v1/users/login", post(users::login))
        .route("/v1/users/refresh-token", post(users::refresh_token))
        .route(
            "/v1/stores/{store_id}/coupons/{code}/check",
            get(coupons::check_coupon),
        )
        .route("/v1/fs/{key}", get(files::serve_file));

    let catalogue = Router::new()
        .route("/v1/products", get(products::list_products))
        .route("/v1/products/{product_id}", get(products::get_product))
        .route("/v1/categories", get(categories::list_categories))
        .route("/v1/stats/products", get(stats::product_stats))
        .route("/v1/stats/categories", get(stats::category_stats))
        .route_layer(from_fn_with_state(state.clone(), store::identify_viewer));

    let user = Router::new()
        .route("/v1/users/logout", post(users::logout))
        .route("/v1/users/me", get(users::get_profile).patch(users::update_profile))
        .route("/v1/stores", post(stores::create_store))
        .route("/v1/orders", post(orders::place_order).get(orders::list_own_orders))
        .route("/v1/orders/{order_id}", get(orders::get_own_order))
        .route(
            "/v1/fs",
            post(files::upload_file).layer(DefaultBodyLimit::max(state.upload_max_bytes)),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate));

    let staff = Router::new()
        .route("/v1/stores/me", get(stores::get_own_store))
        .route("/v1/stores/staffs", get(stores::list_staff).post(stores::add_staff))
        .route(
            "/v1/stores/staffs/{user_id}",
            patch(stores::update_staff_permission).delete(stores::delete_staff),
        )
        .route("/v1/products", post(products::create_product))
        .route(
            "/v1/products/{product_id}",
            patch(products::update_product).delete(products::delete_product),
        )
        .route("/v1/products/{product_id}/attributes", put(products::add_attribute))
        .route(
            "/v1/products/{product_id}/attributes/{key}",
            delete(products::remove_attribute),
        )
        .route("/v1/categories", post(categories::create_category))
        .route(
            "/v1/categories/{category_id}",
            patch(categories::update_category).delete(categories::delete_category),
        )
        .route("/v1/coupons", get(coupons::list_coupons).post(coupons::create_coupon))
        .route(
            "/v1/coupons/{coupon_id}",
            get(coupons::get_coupon)
                .patch(coupons::update_coupon)
                .delete(coupons::delete_coupon),
        )
        .route("/v1/stores/orders", get(orders::list_store_orders))
        .route("/v1/stores/orders/{order_id}", get(orders::get_store_order))
        .route("/v1/stores/orders/{order_id}/status", patch(orders::update_order_status))
        .route(
            "/v1/stores/orders/{order_id}/payment-status",
            patch(orders::update_payment_status),
        )
        .route("/v1/stats/orders", get(stats::order_stats))
        // Layers run bottom-up: authenticate first, then the staff check
        .route_layer(from_fn_with_state(state.clone(), store::require_store_staff))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate));

    let admin = Router::new()
        .route("/v1/settings", patch(settings::update_settings))
        .route("/v1/admin/stores/{store_id}", patch(stores::set_store_activation))
        .route_layer(from_fn(auth::require_admin))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate));

    let [platform, developer, connect] = platform_headers();

    Router::new()
        .merge(public)
        .merge(catalogue)
        .merge(user)
        .merge(staff)
        .merge(admin)
        .fallback(|| async { AppError::NotFound(ErrorCode::ResourceNotFound) })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(platform)
        .layer(developer)
        .layer(connect)
        .with_state(state)
}
