//! User account and session endpoints.
//!
//! - POST /v1/users/register - sign up, gated by the platform settings
//! - POST /v1/users/login - email and password → session tokens
//! - POST /v1/users/refresh-token - rotate a session
//! - POST /v1/users/logout - end the current session
//! - GET/PATCH /v1/users/me - own profile

use axum::{Extension, extract::State};
use chrono::Utc;

use crate::{
    error::{AppError, ErrorCode},
    extract::AppJson,
    middleware::auth::AuthContext,
    models::{
        session::{Session, SessionTokens},
        user::{User, UserStatus},
    },
    repositories::{Entity, RepoError},
    response::ApiResponse,
    services::credentials,
    state::AppState,
    validators::user::{self, ReqLogin, ReqProfileUpdate, ReqRefreshToken, ReqRegister},
};

/// Register a new user.
///
/// # Response
///
/// - **201 Created**: the new user (without password hash)
/// - **403**: `sign_up_disabled`
/// - **409**: `user_already_exists`
/// - **422**: `user_sign_up_data_invalid`
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReqRegister>,
) -> Result<ApiResponse<User>, AppError> {
    let settings = state
        .platform
        .settings()
        .await
        .map_err(|e| e.into_app(Entity::Settings))?;
    if !settings.is_sign_up_enabled {
        return Err(AppError::Forbidden(ErrorCode::SignUpDisabled));
    }

    let input = user::validate_register(request).map_err(AppError::validation(ErrorCode::UserSignUpDataInvalid))?;

    let password_hash =
        credentials::hash_password(&input.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = User::new(input, password_hash, Utc::now());

    state
        .users
        .register(&user)
        .await
        .map_err(|e| e.into_app(Entity::User))?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::created("User registered", user))
}

/// Log in and open a session.
///
/// Unknown emails, wrong passwords and inactive users are indistinguishable
/// to the client: all yield 401 `invalid_credentials`.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReqLogin>,
) -> Result<ApiResponse<SessionTokens>, AppError> {
    let credentials_in = user::validate_login(request).map_err(AppError::validation(ErrorCode::UserLoginDataInvalid))?;

    let user = match state.users.find_by_email(&credentials_in.email).await {
        Ok(user) => user,
        Err(RepoError::NotFound) => return Err(AppError::Unauthorized(ErrorCode::InvalidCredentials)),
        Err(e) => return Err(e.into_app(Entity::User)),
    };

    if user.status != UserStatus::Active
        || !credentials::verify_password(&credentials_in.password, &user.password_hash)
    {
        tracing::warn!(user_id = %user.id, "login rejected");
        return Err(AppError::Unauthorized(ErrorCode::InvalidCredentials));
    }

    let (session, tokens) = Session::issue(user.id, state.sessions, Utc::now());
    state
        .users
        .create_session(&session)
        .await
        .map_err(|e| e.into_app(Entity::User))?;

    Ok(ApiResponse::ok(tokens).with_title("Login successful"))
}

/// Exchange a refresh token for a brand new session.
///
/// The old session is deleted in the same transaction, so both of its
/// tokens stop working.
pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReqRefreshToken>,
) -> Result<ApiResponse<SessionTokens>, AppError> {
    let token = user::validate_refresh(request).map_err(AppError::validation(ErrorCode::UserLoginDataInvalid))?;

    let tokens = state
        .users
        .refresh_session(&credentials::hash_token(&token), state.sessions, Utc::now())
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::Unauthorized(ErrorCode::InvalidRefreshToken),
            other => other.into_app(Entity::User),
        })?;

    Ok(ApiResponse::ok(tokens).with_title("Token refreshed"))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<()>, AppError> {
    state
        .users
        .delete_session(&auth.token_hash)
        .await
        .map_err(|e| e.into_app(Entity::User))?;

    Ok(ApiResponse::message("Logout successful"))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state
        .users
        .get(auth.user_id)
        .await
        .map_err(|e| e.into_app(Entity::User))?;

    Ok(ApiResponse::ok(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(request): AppJson<ReqProfileUpdate>,
) -> Result<ApiResponse<User>, AppError> {
    let changes = user::validate_profile(request).map_err(AppError::validation(ErrorCode::UserUpdateDataInvalid))?;

    let user = state
        .users
        .update_profile(auth.user_id, changes, Utc::now())
        .await
        .map_err(|e| e.into_app(Entity::User))?;

    Ok(ApiResponse::ok(user).with_title("Profile updated"))
}
