//! Store and staff endpoints.
//!
//! The store of every staff route is the caller's own store, resolved by
//! the `require_store_staff` middleware. Staff management is reserved to
//! the owner; the owner row itself can never be changed or removed here.

use axum::{Extension, extract::Query, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    extract::{AppJson, AppPath, ListQuery},
    middleware::{auth::AuthContext, store::StoreStaff},
    models::store::{Staff, Store, StoreUserProfile},
    repositories::{Entity, RepoError},
    response::ApiResponse,
    state::AppState,
    validators::store::{self, ReqStaffCreate, ReqStaffPermission, ReqStoreActivation, ReqStoreCreate},
};

/// Create a store; the caller becomes its owner.
///
/// # Response
///
/// - **201 Created**: the store
/// - **403**: `store_creation_disabled` (admins bypass the flag)
/// - **409**: `user_already_staff` or `store_already_exists`
pub async fn create_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(request): AppJson<ReqStoreCreate>,
) -> Result<ApiResponse<Store>, AppError> {
    let settings = state
        .platform
        .settings()
        .await
        .map_err(|e| e.into_app(Entity::Settings))?;
    if !settings.is_store_creation_enabled && !auth.is_admin() {
        return Err(AppError::Forbidden(ErrorCode::StoreCreationDisabled));
    }

    let input = store::validate_create(request).map_err(AppError::validation(ErrorCode::StoreDataInvalid))?;

    let already_staff = state
        .stores
        .is_staff(auth.user_id)
        .await
        .map_err(|e| e.into_app(Entity::Store))?;
    if already_staff {
        return Err(AppError::Conflict(ErrorCode::UserAlreadyStaff));
    }

    let store = Store::new(input, Utc::now());
    state
        .stores
        .create_with_owner(&store, auth.user_id)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate { constraint } if constraint.starts_with("store_staffs") => {
                AppError::Conflict(ErrorCode::UserAlreadyStaff)
            }
            other => other.into_app(Entity::Store),
        })?;

    tracing::info!(store_id = %store.id, owner_id = %auth.user_id, "store created");

    Ok(ApiResponse::created("Store created", store))
}

/// The caller's store.
pub async fn get_own_store(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
) -> Result<ApiResponse<Store>, AppError> {
    let store = state
        .stores
        .get(staff.store_id)
        .await
        .map_err(|e| e.into_app(Entity::Store))?;

    Ok(ApiResponse::ok(store))
}

/// List or search (`query` on name and email) the staff of the store.
pub async fn list_staff(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<StoreUserProfile>>, AppError> {
    let members = state
        .stores
        .list_staff(staff.store_id, query.search(), query.page())
        .await
        .map_err(|e| e.into_app(Entity::Staff))?;

    Ok(ApiResponse::ok(members))
}

/// Add an existing user, found by email, as manager or staff.
pub async fn add_staff(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppJson(request): AppJson<ReqStaffCreate>,
) -> Result<ApiResponse<StoreUserProfile>, AppError> {
    staff.require_owner()?;

    let new_staff = store::validate_staff(request).map_err(AppError::validation(ErrorCode::StaffDataInvalid))?;

    let user = state
        .users
        .find_by_email(&new_staff.email)
        .await
        .map_err(|e| e.into_app(Entity::User))?;

    let member = Staff {
        store_id: staff.store_id,
        user_id: user.id,
        permission: new_staff.permission,
        created_at: Utc::now(),
    };

    // A user belongs to at most one store
    state
        .stores
        .add_staff(&member)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate { .. } => AppError::Conflict(ErrorCode::UserAlreadyStaff),
            other => other.into_app(Entity::Staff),
        })?;

    tracing::info!(store_id = %staff.store_id, user_id = %user.id, "staff added");

    Ok(ApiResponse::created(
        "Staff added",
        StoreUserProfile {
            user_id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            profile_picture: user.profile_picture,
            permission: member.permission,
        },
    ))
}

pub async fn update_staff_permission(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqStaffPermission>,
) -> Result<ApiResponse<()>, AppError> {
    staff.require_owner()?;

    let permission =
        store::validate_staff_permission(request).map_err(AppError::validation(ErrorCode::StaffDataInvalid))?;

    state
        .stores
        .update_staff_permission(staff.store_id, user_id, permission)
        .await
        .map_err(|e| e.into_app(Entity::Staff))?;

    Ok(ApiResponse::message("Staff permission updated"))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Extension(staff): Extension<StoreStaff>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    staff.require_owner()?;

    state
        .stores
        .delete_staff(staff.store_id, user_id)
        .await
        .map_err(|e| e.into_app(Entity::Staff))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Admin: activate or deactivate any store.
pub async fn set_store_activation(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReqStoreActivation>,
) -> Result<ApiResponse<Store>, AppError> {
    let store = state
        .stores
        .set_active(store_id, request.is_active, Utc::now())
        .await
        .map_err(|e| e.into_app(Entity::Store))?;

    tracing::info!(store_id = %store.id, is_active = store.is_active, "store activation changed");

    Ok(ApiResponse::ok(store).with_title("Store updated"))
}
