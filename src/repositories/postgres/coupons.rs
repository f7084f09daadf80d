use async_trait::async_trait;
use uuid::Uuid;

use super::expect_affected;
use crate::{
    db::DbPool,
    models::{Page, coupon::Coupon},
    repositories::{CouponRepository, RepoResult},
};

pub(crate) const COUPON_COLUMNS: &str = "id, store_id, code, discount_amount, is_flat_discount, \
     max_discount, max_usage, usage_count, is_active, start_at, expire_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgCouponRepository {
    pool: DbPool,
}

impl PgCouponRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    async fn create(&self, coupon: &Coupon) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO coupons (id, store_id, code, discount_amount, is_flat_discount, \
             max_discount, max_usage, usage_count, is_active, start_at, expire_at, created_at, \
             updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(coupon.id)
        .bind(coupon.store_id)
        .bind(&coupon.code)
        .bind(coupon.discount_amount)
        .bind(coupon.is_flat_discount)
        .bind(coupon.max_discount)
        .bind(coupon.max_usage)
        .bind(coupon.usage_count)
        .bind(coupon.is_active)
        .bind(coupon.start_at)
        .bind(coupon.expire_at)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, store_id: Uuid, coupon_id: Uuid) -> RepoResult<Coupon> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1 AND store_id = $2"
        ))
        .bind(coupon_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(coupon)
    }

    async fn find_by_code(&self, store_id: Uuid, code: &str) -> RepoResult<Coupon> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE store_id = $1 AND code = $2"
        ))
        .bind(store_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(coupon)
    }

    async fn update(&self, coupon: &Coupon) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE coupons SET code = $3, discount_amount = $4, is_flat_discount = $5, \
             max_discount = $6, max_usage = $7, is_active = $8, start_at = $9, expire_at = $10, \
             updated_at = $11 \
             WHERE id = $1 AND store_id = $2",
        )
        .bind(coupon.id)
        .bind(coupon.store_id)
        .bind(&coupon.code)
        .bind(coupon.discount_amount)
        .bind(coupon.is_flat_discount)
        .bind(coupon.max_discount)
        .bind(coupon.max_usage)
        .bind(coupon.is_active)
        .bind(coupon.start_at)
        .bind(coupon.expire_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn delete(&self, store_id: Uuid, coupon_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1 AND store_id = $2")
            .bind(coupon_id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        expect_affected(result.rows_affected())
    }

    async fn list(&self, store_id: Uuid, page: Page) -> RepoResult<Vec<Coupon>> {
        let coupons = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE store_id = $1 \
             ORDER BY created_at DESC, id OFFSET $2 LIMIT $3"
        ))
        .bind(store_id)
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(coupons)
    }
}
