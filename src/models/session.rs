//! Login sessions.
//!
//! A session pairs an access token with a refresh token. Only SHA-256
//! hashes of both are stored; the clear tokens are handed out once, in
//! [`SessionTokens`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{config::SessionLifetimes, services::credentials};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Tokens returned to the client on login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session for `user_id` with newly generated tokens.
    pub fn issue(user_id: Uuid, lifetimes: SessionLifetimes, now: DateTime<Utc>) -> (Self, SessionTokens) {
        let access_token = credentials::generate_token();
        let refresh_token = credentials::generate_token();

        let session = Self {
            id: Uuid::new_v4(),
            user_id,
            access_token_hash: credentials::hash_token(&access_token),
            refresh_token_hash: credentials::hash_token(&refresh_token),
            access_expires_at: now + lifetimes.access,
            refresh_expires_at: now + lifetimes.refresh,
            created_at: now,
        };

        let tokens = SessionTokens {
            access_token,
            refresh_token,
            access_token_expires_at: session.access_expires_at,
            refresh_token_expires_at: session.refresh_expires_at,
        };

        (session, tokens)
    }
}
