use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::SessionLifetimes,
    db::DbPool,
    models::{
        session::{Session, SessionTokens},
        user::{AuthUser, ProfileChanges, User, UserStatus},
    },
    repositories::{RepoError, RepoResult, UserRepository},
};

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, profile_picture, status, \
     permission_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn insert_session<'e, E>(executor: E, session: &Session) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO sessions (id, user_id, access_token_hash, refresh_token_hash, \
         access_expires_at, refresh_expires_at, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.access_token_hash)
    .bind(&session.refresh_token_hash)
    .bind(session.access_expires_at)
    .bind(session.refresh_expires_at)
    .bind(session.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn register(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, phone, profile_picture, status, \
             permission_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.profile_picture)
        .bind(user.status)
        .bind(user.permission_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get(&self, user_id: Uuid) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = COALESCE($2, name), phone = COALESCE($3, phone), \
             profile_picture = COALESCE($4, profile_picture), updated_at = $5 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.phone)
        .bind(changes.profile_picture)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn authenticate(&self, access_token_hash: &str, now: DateTime<Utc>) -> RepoResult<AuthUser> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT u.id AS user_id, up.permission \
             FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             JOIN user_permissions up ON up.id = u.permission_id \
             WHERE s.access_token_hash = $1 AND s.access_expires_at > $2 AND u.status = $3",
        )
        .bind(access_token_hash)
        .bind(now)
        .bind(UserStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_session(&self, session: &Session) -> RepoResult<()> {
        insert_session(&self.pool, session).await?;
        Ok(())
    }

    async fn delete_session(&self, access_token_hash: &str) -> RepoResult<()> {
        sqlx::query("DELETE FROM sessions WHERE access_token_hash = $1")
            .bind(access_token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn refresh_session(
        &self,
        refresh_token_hash: &str,
        lifetimes: SessionLifetimes,
        now: DateTime<Utc>,
    ) -> RepoResult<SessionTokens> {
        let mut tx = self.pool.begin().await?;

        // Row lock: two concurrent refreshes with the same token cannot both win
        let (session_id, user_id): (Uuid, Uuid) = sqlx::query_as(
            "SELECT s.id, s.user_id FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.refresh_token_hash = $1 AND s.refresh_expires_at > $2 AND u.status = $3 \
             FOR UPDATE OF s",
        )
        .bind(refresh_token_hash)
        .bind(now)
        .bind(UserStatus::Active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound)?;

        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        let (session, tokens) = Session::issue(user_id, lifetimes, now);
        insert_session(&mut *tx, &session).await?;

        tx.commit().await?;

        Ok(tokens)
    }
}
