//! Session token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the access token from the Authorization header
//! 2. Hash it and look up a live session
//! 3. Inject the authentication context into the request
//! 4. Reject unauthorized requests with HTTP 401

use axum::{
    Extension,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    models::user::Permission,
    repositories::{Entity, RepoError},
    services::credentials::hash_token,
    state::AppState,
};

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub permission: Permission,

    /// Hash of the presented access token, used by logout.
    pub token_hash: String,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.permission == Permission::Admin
    }
}

/// `Authorization: Bearer <token>` → `<token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve a token to its session owner.
///
/// Unknown or expired tokens and inactive users all yield `None`.
pub async fn resolve(state: &AppState, token: &str) -> Result<Option<AuthContext>, AppError> {
    let token_hash = hash_token(token);

    match state.users.authenticate(&token_hash, Utc::now()).await {
        Ok(user) => Ok(Some(AuthContext {
            user_id: user.user_id,
            permission: user.permission,
            token_hash,
        })),
        Err(RepoError::NotFound) => Ok(None),
        Err(e) => Err(e.into_app(Entity::User)),
    }
}

/// Require a valid access token.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` from the request
/// 2. Hash the token with SHA-256
/// 3. Look up an unexpired session of an active user
/// 4. If found: inject `AuthContext` and call the next handler
/// 5. Otherwise: 401 `invalid_authorization_token`
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or(AppError::Unauthorized(ErrorCode::InvalidAuthorizationToken))?
        .to_string();

    let auth = resolve(&state, &token)
        .await?
        .ok_or(AppError::Unauthorized(ErrorCode::InvalidAuthorizationToken))?;

    request.extensions_mut().insert(auth);

    Ok(next.run(request).await)
}

/// Platform admins only. Must run after [`authenticate`].
pub async fn require_admin(
    Extension(auth): Extension<AuthContext>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !auth.is_admin() {
        tracing::warn!(user_id = %auth.user_id, "admin route denied");
        return Err(AppError::Forbidden(ErrorCode::AdminOnly));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }
}
