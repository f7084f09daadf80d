//! Product catalogue endpoints.
//!
//! Reads are open to everyone; what comes back depends on the [`Viewer`]:
//! staff see every product of their store with all fields, the public sees
//! published products of active stores without the download link.
//!
//! Writes require store staff and are scoped to the staff's store. A
//! product id of another store is reported as `product_not_found`.

use axum::{Extension, extract::Query, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    extract::{AppJson, AppPath, ListQuery},
    middleware::store::{StoreStaff, Viewer},
    models::product::{
        Product, ProductAttribute, ProductDetails, ProductList, ProductView, PublicProductDetails,
    },
    repositories::{Entity, RepoError},
    response::ApiResponse,
    state::AppState,
    validators::product::{self, ReqProductAttribute, ReqProductCreate, ReqProductUpdate},
};

/// List or search (`query` on name and SKU) products.
///
/// # Query Parameters
///
/// - `page`, `limit`: pagination, defaults 1 and 10
/// - `query`: optional search term
pub async fn list_products(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<ProductList>, AppError> {
    let list = match viewer {
        Viewer::Staff { store_id } => ProductList::Staff(
            state
                .products
                .list_by_store(store_id, query.search(), query.page())
                .await
                .map_err(|e| e.into_app(Entity::Product))?,
        ),
        Viewer::Public => ProductList::Public(
            state
                .products
                .list(query.search(), query.page())
                .await
                .map_err(|e| e.into_app(Entity::Product))?,
        ),
    };

    Ok(ApiResponse::ok(list))
}

/// Single product with its attributes.
pub async fn get_product(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    AppPath(product_id): AppPath<Uuid>,
) -> Result<ApiResponse<ProductView>, AppError> {
    let view = match viewer {
        Viewer::Staff { store_id } => {
            let product = state
                .products
                .get(store_id, product_id)
                .await
                .map_err(|e| e.into_app(Entity::Product))?;
            let attributes = state
                .products
                .attributes(product.id)
                .await
                .map_err(|e| e.into_app(Entity::ProductAttribute))?;

            ProductView::Staff(ProductDetails { product, attributes })
        }
        Viewer::Public => {
            let product = state
                .products
                .details(product_id)
                .await
                .map_err(|e| e.into_app(Entity::Product))?;
            let attributes = state
                .products
                .attributes(product.id)
                .await
                .map_err(|e| e.into_app(Entity::ProductAttribute))?;

            ProductView::Public(PublicProductDetails { product, attributes })
        }
    };

    Ok(ApiResponse::ok(view))
}

/// Create a product in the caller's store.
///
/// # Response
///
/// - **201 Created**: the product
/// - **409**: `product_already_exists` (SKU taken in this store)
/// - **422**: `product_data_invalid`, also for a category of another store
pub async fn create_product(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppJson(request): AppJson<ReqProductCreate>,
) -> Result<ApiResponse<Product>, AppError> {
    let input = product::validate_create(request).map_err(AppError::validation(ErrorCode::ProductDataInvalid))?;

    let product = Product::new(staff.store_id, input, Utc::now());
    state
        .products
        .create(&product)
        .await
        .map_err(|e| e.into_app(Entity::Product))?;

    tracing::info!(product_id = %product.id, store_id = %staff.store_id, "product created");

    Ok(ApiResponse::created("Product created", product))
}

/// Partial update. `category_id: ""` clears the category.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(product_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqProductUpdate>,
) -> Result<ApiResponse<Product>, AppError> {
    let changes = product::validate_update(request).map_err(AppError::validation(ErrorCode::ProductDataInvalid))?;

    let mut product = state
        .products
        .get(staff.store_id, product_id)
        .await
        .map_err(|e| e.into_app(Entity::Product))?;

    product.apply(changes, Utc::now());

    // Only checkable on the merged record
    if product.is_digital && product.digital_download_link.is_none() {
        return Err(AppError::invalid_field(
            ErrorCode::ProductDataInvalid,
            "digital_download_link",
            "digital products require a download link",
        ));
    }

    state
        .products
        .update(&product)
        .await
        .map_err(|e| e.into_app(Entity::Product))?;

    Ok(ApiResponse::ok(product).with_title("Product updated"))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(product_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .products
        .delete(staff.store_id, product_id)
        .await
        .map_err(|e| e.into_app(Entity::Product))?;

    tracing::info!(product_id = %product_id, store_id = %staff.store_id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Attach a key/value attribute. Keys are unique per product.
pub async fn add_attribute(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(product_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqProductAttribute>,
) -> Result<ApiResponse<ProductAttribute>, AppError> {
    let (key, value) =
        product::validate_attribute(request).map_err(AppError::validation(ErrorCode::ProductAttributeDataInvalid))?;

    let attribute = ProductAttribute { product_id, key, value };
    state
        .products
        .add_attribute(staff.store_id, &attribute)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound(ErrorCode::ProductNotFound),
            other => other.into_app(Entity::ProductAttribute),
        })?;

    Ok(ApiResponse::created("Product attribute added", attribute))
}

pub async fn remove_attribute(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath((product_id, key)): AppPath<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    state
        .products
        .remove_attribute(staff.store_id, product_id, &key)
        .await
        .map_err(|e| e.into_app(Entity::ProductAttribute))?;

    Ok(StatusCode::NO_CONTENT)
}
