//! PostgreSQL adapters.
//!
//! All adapters share one [`DbPool`]. Queries are checked at run time with
//! `sqlx::query_as::<_, T>`, rows map onto the model structs via `FromRow`.

mod categories;
mod coupons;
mod orders;
mod platform;
mod products;
mod stores;
mod users;

pub use categories::PgCategoryRepository;
pub use coupons::PgCouponRepository;
pub use orders::PgOrderRepository;
pub use platform::PgPlatformRepository;
pub use products::PgProductRepository;
pub use stores::PgStoreRepository;
pub use users::PgUserRepository;

use super::{RepoError, RepoResult};

/// `LIKE` pattern matching `query` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Zero affected rows means the tenant-scoped target does not exist.
pub(crate) fn expect_affected(rows: u64) -> RepoResult<()> {
    if rows == 0 {
        Err(RepoError::NotFound)
    } else {
        Ok(())
    }
}
