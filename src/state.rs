//! Shared application state.
//!
//! Built once at start-up and cloned into every handler through axum's
//! `State` extractor. Repositories are trait objects so the HTTP tests can
//! swap the PostgreSQL adapters for the in-memory one.

use std::sync::Arc;

use crate::{
    config::SessionLifetimes,
    db::DbPool,
    repositories::{
        CategoryRepository, CouponRepository, OrderRepository, PlatformRepository,
        ProductRepository, StoreRepository, UserRepository,
        postgres::{
            PgCategoryRepository, PgCouponRepository, PgOrderRepository, PgPlatformRepository,
            PgProductRepository, PgStoreRepository, PgUserRepository,
        },
    },
    services::storage::ObjectStore,
};

#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<dyn PlatformRepository>,
    pub users: Arc<dyn UserRepository>,
    pub stores: Arc<dyn StoreRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub coupons: Arc<dyn CouponRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub objects: Arc<dyn ObjectStore>,
    pub sessions: SessionLifetimes,
    pub upload_max_bytes: usize,
}

impl AppState {
    /// Every repository backed by the same connection pool.
    pub fn postgres(
        pool: DbPool,
        objects: Arc<dyn ObjectStore>,
        sessions: SessionLifetimes,
        upload_max_bytes: usize,
    ) -> Self {
        Self {
            platform: Arc::new(PgPlatformRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            stores: Arc::new(PgStoreRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            coupons: Arc::new(PgCouponRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool)),
            objects,
            sessions,
            upload_max_bytes,
        }
    }

    /// State over one in-memory database and object store.
    #[cfg(test)]
    pub fn in_memory(
        db: Arc<crate::repositories::memory::MemoryDatabase>,
        objects: Arc<crate::services::storage::MemoryObjectStore>,
    ) -> Self {
        Self {
            platform: db.clone(),
            users: db.clone(),
            stores: db.clone(),
            products: db.clone(),
            categories: db.clone(),
            coupons: db.clone(),
            orders: db,
            objects,
            sessions: SessionLifetimes::default(),
            upload_max_bytes: 1024 * 1024,
        }
    }
}
