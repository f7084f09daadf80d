//! Persistence ports.
//!
//! One trait per aggregate. Handlers only see these traits through
//! [`AppState`](crate::state::AppState); the PostgreSQL adapters live in
//! [`postgres`], an in-memory adapter backs the HTTP tests.
//!
//! # Tenant scoping
//!
//! Every method taking a `store_id` only sees records of that store. A
//! record of another store is reported as [`RepoError::NotFound`], never as
//! a permission error, so its existence does not leak.

pub mod error;
#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use error::{Entity, RepoError, RepoResult};

use crate::{
    config::SessionLifetimes,
    models::{
        Page,
        category::{Category, CategoryStats},
        coupon::Coupon,
        order::{Order, OrderDetails, OrderStatRow, OrderStatus, PaymentStatus, PlaceOrder, Summary},
        product::{Product, ProductAttribute, ProductStats, PublicProduct},
        session::{Session, SessionTokens},
        settings::{Settings, SettingsChanges},
        store::{Staff, StaffPermission, StaffProfile, Store, StoreUserProfile},
        user::{AuthUser, ProfileChanges, User},
    },
};

/// Number of entries returned by the stats endpoints.
pub const STATS_LIMIT: i64 = 25;

#[async_trait]
pub trait PlatformRepository: Send + Sync {
    /// Round trip to the database.
    async fn ping(&self) -> RepoResult<()>;

    async fn settings(&self) -> RepoResult<Settings>;

    async fn update_settings(&self, changes: SettingsChanges, now: DateTime<Utc>) -> RepoResult<Settings>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn register(&self, user: &User) -> RepoResult<()>;

    async fn find_by_email(&self, email: &str) -> RepoResult<User>;

    async fn get(&self, user_id: Uuid) -> RepoResult<User>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<User>;

    /// Identity behind an unexpired access token of an active user.
    async fn authenticate(&self, access_token_hash: &str, now: DateTime<Utc>) -> RepoResult<AuthUser>;

    async fn create_session(&self, session: &Session) -> RepoResult<()>;

    /// Logout.
    async fn delete_session(&self, access_token_hash: &str) -> RepoResult<()>;

    /// Atomically replace the session owning `refresh_token_hash` with a new
    /// one. Both old tokens stop working.
    async fn refresh_session(
        &self,
        refresh_token_hash: &str,
        lifetimes: SessionLifetimes,
        now: DateTime<Utc>,
    ) -> RepoResult<SessionTokens>;
}

#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Insert the store and make `owner_id` its owner, in one transaction.
    async fn create_with_owner(&self, store: &Store, owner_id: Uuid) -> RepoResult<()>;

    async fn get(&self, store_id: Uuid) -> RepoResult<Store>;

    async fn set_active(&self, store_id: Uuid, is_active: bool, now: DateTime<Utc>) -> RepoResult<Store>;

    /// Store membership of a user.
    async fn staff_profile(&self, user_id: Uuid) -> RepoResult<StaffProfile>;

    async fn is_staff(&self, user_id: Uuid) -> RepoResult<bool>;

    async fn add_staff(&self, staff: &Staff) -> RepoResult<()>;

    /// List staff, filtered by name or email when `query` is given.
    async fn list_staff(
        &self,
        store_id: Uuid,
        query: Option<&str>,
        page: Page,
    ) -> RepoResult<Vec<StoreUserProfile>>;

    /// Owners are never matched.
    async fn update_staff_permission(
        &self,
        store_id: Uuid,
        user_id: Uuid,
        permission: StaffPermission,
    ) -> RepoResult<()>;

    /// Owners are never matched.
    async fn delete_staff(&self, store_id: Uuid, user_id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product. A category must belong to the product's store.
    async fn create(&self, product: &Product) -> RepoResult<()>;

    /// Staff read.
    async fn get(&self, store_id: Uuid, product_id: Uuid) -> RepoResult<Product>;

    /// Public read: published products of active stores only.
    async fn details(&self, product_id: Uuid) -> RepoResult<PublicProduct>;

    /// Write back a merged product. Same category rule as `create`.
    async fn update(&self, product: &Product) -> RepoResult<()>;

    async fn delete(&self, store_id: Uuid, product_id: Uuid) -> RepoResult<()>;

    /// Public catalogue, searched by name or SKU when `query` is given.
    async fn list(&self, query: Option<&str>, page: Page) -> RepoResult<Vec<PublicProduct>>;

    /// Every product of a store, drafts included.
    async fn list_by_store(
        &self,
        store_id: Uuid,
        query: Option<&str>,
        page: Page,
    ) -> RepoResult<Vec<Product>>;

    async fn attributes(&self, product_id: Uuid) -> RepoResult<Vec<ProductAttribute>>;

    /// Duplicate keys are `Duplicate`.
    async fn add_attribute(&self, store_id: Uuid, attribute: &ProductAttribute) -> RepoResult<()>;

    async fn remove_attribute(&self, store_id: Uuid, product_id: Uuid, key: &str) -> RepoResult<()>;

    /// Most ordered products, platform-wide (public) or for one store.
    async fn stats(&self, store_id: Option<Uuid>, limit: i64) -> RepoResult<Vec<ProductStats>>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> RepoResult<()>;

    async fn get(&self, store_id: Uuid, category_id: Uuid) -> RepoResult<Category>;

    async fn update(&self, category: &Category) -> RepoResult<()>;

    async fn delete(&self, store_id: Uuid, category_id: Uuid) -> RepoResult<()>;

    /// Categories of one store, or of every active store.
    async fn list(&self, store_id: Option<Uuid>, page: Page) -> RepoResult<Vec<Category>>;

    /// Categories with the most products.
    async fn stats(&self, store_id: Option<Uuid>, limit: i64) -> RepoResult<Vec<CategoryStats>>;
}

#[async_trait]
pub trait CouponRepository: Send + Sync {
    async fn create(&self, coupon: &Coupon) -> RepoResult<()>;

    async fn get(&self, store_id: Uuid, coupon_id: Uuid) -> RepoResult<Coupon>;

    async fn find_by_code(&self, store_id: Uuid, code: &str) -> RepoResult<Coupon>;

    async fn update(&self, coupon: &Coupon) -> RepoResult<()>;

    async fn delete(&self, store_id: Uuid, coupon_id: Uuid) -> RepoResult<()>;

    async fn list(&self, store_id: Uuid, page: Page) -> RepoResult<Vec<Coupon>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Price and persist an order in one transaction: lock the products,
    /// decrement stock, count the coupon use, insert order and items.
    async fn place(&self, user_id: Uuid, order: &PlaceOrder, now: DateTime<Utc>) -> RepoResult<OrderDetails>;

    async fn get_for_user(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<OrderDetails>;

    async fn get_for_store(&self, store_id: Uuid, order_id: Uuid) -> RepoResult<OrderDetails>;

    async fn list_for_user(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<Order>>;

    async fn list_for_store(&self, store_id: Uuid, page: Page) -> RepoResult<Vec<Order>>;

    /// Orders in a terminal status are `Rejected`.
    async fn update_status(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order>;

    async fn update_payment_status(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        payment_status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order>;

    /// All-time summary of a store.
    async fn summary(&self, store_id: Uuid) -> RepoResult<Summary>;

    /// Orders of a store created in `[from, to)`.
    async fn stat_rows(
        &self,
        store_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<OrderStatRow>>;
}
