//! Store staff checks.
//!
//! Store-scoped routes never take a store id from the client: the store is
//! the one the authenticated user is staff of. Two flavours exist:
//!
//! - [`require_store_staff`] rejects anyone who is not staff of an active
//!   store (403).
//! - [`identify_viewer`] never rejects; it records whether the caller gets
//!   the staff view or the public view of a catalogue endpoint.

use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::auth::{AuthContext, bearer_token, resolve};
use crate::{
    error::{AppError, ErrorCode},
    models::store::{StaffPermission, StaffProfile},
    repositories::{Entity, RepoError},
    state::AppState,
};

/// Staff membership of the caller, inserted by [`require_store_staff`].
#[derive(Debug, Clone, Copy)]
pub struct StoreStaff {
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub permission: StaffPermission,
}

impl StoreStaff {
    /// Staff management is reserved to the owner.
    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.permission == StaffPermission::Owner {
            Ok(())
        } else {
            Err(AppError::Forbidden(ErrorCode::StaffPermissionDenied))
        }
    }
}

/// Which projection of catalogue data the caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Staff of an active store: full records of that store.
    Staff { store_id: Uuid },
    /// Everyone else: published products of active stores.
    Public,
}

impl Viewer {
    pub fn store_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Staff { store_id } => Some(*store_id),
            Viewer::Public => None,
        }
    }
}

async fn staff_profile(state: &AppState, user_id: Uuid) -> Result<Option<StaffProfile>, AppError> {
    match state.stores.staff_profile(user_id).await {
        Ok(profile) => Ok(Some(profile)),
        Err(RepoError::NotFound) => Ok(None),
        Err(e) => Err(e.into_app(Entity::Staff)),
    }
}

/// Require staff of an active store. Must run after
/// [`authenticate`](super::auth::authenticate).
pub async fn require_store_staff(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let profile = staff_profile(&state, auth.user_id)
        .await?
        .ok_or(AppError::Forbidden(ErrorCode::UserNotStoreStaff))?;

    if !profile.is_store_active {
        return Err(AppError::Forbidden(ErrorCode::StoreNotActive));
    }

    request.extensions_mut().insert(StoreStaff {
        store_id: profile.store_id,
        user_id: profile.user_id,
        permission: profile.permission,
    });

    Ok(next.run(request).await)
}

/// Insert a [`Viewer`] for optionally authenticated routes.
///
/// A missing or invalid token, or staff of an inactive store, gets the
/// public view.
pub async fn identify_viewer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let mut viewer = Viewer::Public;

    if let Some(token) = bearer_token(request.headers()).map(str::to_string)
        && let Some(auth) = resolve(&state, &token).await?
    {
        if let Some(profile) = staff_profile(&state, auth.user_id).await?
            && profile.is_store_active
        {
            viewer = Viewer::Staff {
                store_id: profile.store_id,
            };
        }
        request.extensions_mut().insert(auth);
    }

    request.extensions_mut().insert(viewer);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_owner_manages_staff() {
        let staff = |permission| StoreStaff {
            store_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            permission,
        };

        assert!(staff(StaffPermission::Owner).require_owner().is_ok());
        assert!(staff(StaffPermission::Manager).require_owner().is_err());
        assert!(staff(StaffPermission::Staff).require_owner().is_err());
    }

    #[test]
    fn public_viewer_has_no_store() {
        let id = Uuid::new_v4();
        assert_eq!(Viewer::Staff { store_id: id }.store_id(), Some(id));
        assert_eq!(Viewer::Public.store_id(), None);
    }
}
