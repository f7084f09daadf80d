use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{contains_pattern, expect_affected};
use crate::{
    db::DbPool,
    models::{
        Page,
        store::{Staff, StaffPermission, StaffProfile, Store, StoreUserProfile},
    },
    repositories::{RepoResult, StoreRepository},
};

const STORE_COLUMNS: &str = "id, name, address, city, country, postcode, email, phone, description, \
     is_active, created_at, updated_at";

#[derive(Clone)]
pub struct PgStoreRepository {
    pool: DbPool,
}

impl PgStoreRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn create_with_owner(&self, store: &Store, owner_id: Uuid) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO stores (id, name, address, city, country, postcode, email, phone, \
             description, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.city)
        .bind(&store.country)
        .bind(&store.postcode)
        .bind(&store.email)
        .bind(&store.phone)
        .bind(&store.description)
        .bind(store.is_active)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO store_staffs (store_id, user_id, permission, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(store.id)
        .bind(owner_id)
        .bind(StaffPermission::Owner)
        .bind(store.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn get(&self, store_id: Uuid) -> RepoResult<Store> {
        let store = sqlx::query_as::<_, Store>(&format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"))
            .bind(store_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(store)
    }

    async fn set_active(&self, store_id: Uuid, is_active: bool, now: DateTime<Utc>) -> RepoResult<Store> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "UPDATE stores SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING {STORE_COLUMNS}"
        ))
        .bind(store_id)
        .bind(is_active)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(store)
    }

    async fn staff_profile(&self, user_id: Uuid) -> RepoResult<StaffProfile> {
        let profile = sqlx::query_as::<_, StaffProfile>(
            "SELECT ss.store_id, ss.user_id, ss.permission, s.is_active AS is_store_active \
             FROM store_staffs ss JOIN stores s ON s.id = ss.store_id \
             WHERE ss.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn is_staff(&self, user_id: Uuid) -> RepoResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM store_staffs WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn add_staff(&self, staff: &Staff) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO store_staffs (store_id, user_id, permission, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(staff.store_id)
        .bind(staff.user_id)
        .bind(staff.permission)
        .bind(staff.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_staff(
        &self,
        store_id: Uuid,
        query: Option<&str>,
        page: Page,
    ) -> RepoResult<Vec<StoreUserProfile>> {
        let staff = sqlx::query_as::<_, StoreUserProfile>(
            "SELECT u.id AS user_id, u.name, u.email, u.phone, u.profile_picture, ss.permission \
             FROM store_staffs ss JOIN users u ON u.id = ss.user_id \
             WHERE ss.store_id = $1 AND ($2::TEXT IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2) \
             ORDER BY ss.created_at, u.id \
             OFFSET $3 LIMIT $4",
        )
        .bind(store_id)
        .bind(query.map(contains_pattern))
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn update_staff_permission(
        &self,
        store_id: Uuid,
        user_id: Uuid,
        permission: StaffPermission,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE store_staffs SET permission = $3 \
             WHERE store_id = $1 AND user_id = $2 AND permission <> $4",
        )
        .bind(store_id)
        .bind(user_id)
        .bind(permission)
        .bind(StaffPermission::Owner)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn delete_staff(&self, store_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM store_staffs WHERE store_id = $1 AND user_id = $2 AND permission <> $3",
        )
        .bind(store_id)
        .bind(user_id)
        .bind(StaffPermission::Owner)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }
}
