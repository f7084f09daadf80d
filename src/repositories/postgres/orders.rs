//! Order persistence.
//!
//! Placement is the only multi-table write of the platform:
//!
//! ```text
//! BEGIN
//!   SELECT products ... FOR UPDATE        -- lock stock, sorted by id
//!   SELECT coupon ... FOR UPDATE          -- when a code is given
//!   UPDATE products SET stock = stock - q
//!   UPDATE coupons SET usage_count = usage_count + 1
//!   INSERT orders, order_items
//! COMMIT
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::coupons::COUPON_COLUMNS;
use crate::{
    db::DbPool,
    models::{
        Page,
        coupon::Coupon,
        order::{
            Order, OrderDetails, OrderItem, OrderStatRow, OrderStatus, PaymentStatus, PlaceOrder,
            PricingError, Summary, price_order,
        },
        product::Product,
    },
    repositories::{OrderRepository, RepoError, RepoResult},
};

const ORDER_COLUMNS: &str = "id, store_id, user_id, status, payment_status, billing_address_id, \
     shipping_address_id, payment_method_id, shipping_method_id, coupon_id, sub_total, discount, \
     grand_total, item_count, created_at, updated_at";

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: DbPool,
}

impl PgOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn items(&self, order: Order) -> RepoResult<OrderDetails> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT order_id, product_id, name, price, quantity, sub_total \
             FROM order_items WHERE order_id = $1 ORDER BY name",
        )
        .bind(order.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderDetails { order, items })
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn place(&self, user_id: Uuid, request: &PlaceOrder, now: DateTime<Utc>) -> RepoResult<OrderDetails> {
        let mut tx = self.pool.begin().await?;

        // Sorted locking keeps concurrent checkouts from deadlocking
        let products: HashMap<Uuid, Product> = sqlx::query_as::<_, Product>(
            "SELECT p.id, p.store_id, p.category_id, p.name, p.description, p.sku, p.unit, \
             p.price, p.stock, p.is_shippable, p.is_digital, p.is_published, p.image, \
             p.additional_images, p.digital_download_link, p.created_at, p.updated_at \
             FROM products p JOIN stores s ON s.id = p.store_id \
             WHERE p.id = ANY($1) AND s.is_active \
             ORDER BY p.id \
             FOR UPDATE OF p",
        )
        .bind(request.product_ids())
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

        let mut pricing = price_order(&request.lines, &products, None, now)?;

        let coupon = match &request.coupon_code {
            Some(code) => {
                let coupon = sqlx::query_as::<_, Coupon>(&format!(
                    "SELECT {COUPON_COLUMNS} FROM coupons WHERE store_id = $1 AND code = $2 FOR UPDATE"
                ))
                .bind(pricing.store_id)
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(PricingError::CouponUnavailable)?;

                pricing = price_order(&request.lines, &products, Some(&coupon), now)?;
                Some(coupon)
            }
            None => None,
        };

        for line in &pricing.items {
            sqlx::query("UPDATE products SET stock = stock - $2, updated_at = $3 WHERE id = $1")
                .bind(line.product_id)
                .bind(line.quantity)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(coupon) = &coupon {
            sqlx::query("UPDATE coupons SET usage_count = usage_count + 1 WHERE id = $1")
                .bind(coupon.id)
                .execute(&mut *tx)
                .await?;
        }

        let details = OrderDetails::placed(user_id, request, pricing, coupon.map(|c| c.id), now);
        let order = &details.order;

        sqlx::query(&format!(
            "INSERT INTO orders ({ORDER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        ))
        .bind(order.id)
        .bind(order.store_id)
        .bind(order.user_id)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(&order.billing_address_id)
        .bind(&order.shipping_address_id)
        .bind(&order.payment_method_id)
        .bind(&order.shipping_method_id)
        .bind(order.coupon_id)
        .bind(order.sub_total)
        .bind(order.discount)
        .bind(order.grand_total)
        .bind(order.item_count)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &details.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, name, price, quantity, sub_total) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.sub_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %details.order.id,
            store_id = %details.order.store_id,
            grand_total = details.order.grand_total,
            "order placed"
        );

        Ok(details)
    }

    async fn get_for_user(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<OrderDetails> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        self.items(order).await
    }

    async fn get_for_store(&self, store_id: Uuid, order_id: Uuid) -> RepoResult<OrderDetails> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND store_id = $2"
        ))
        .bind(order_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        self.items(order).await
    }

    async fn list_for_user(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC, id OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn list_for_store(&self, store_id: Uuid, page: Page) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE store_id = $1 \
             ORDER BY created_at DESC, id OFFSET $2 LIMIT $3"
        ))
        .bind(store_id)
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let mut tx = self.pool.begin().await?;

        let current: OrderStatus =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 AND store_id = $2 FOR UPDATE")
                .bind(order_id)
                .bind(store_id)
                .fetch_one(&mut *tx)
                .await?;

        if current.is_terminal() {
            return Err(RepoError::rejected("status", "order status can no longer change"));
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(status)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn update_payment_status(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        payment_status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET payment_status = $3, updated_at = $4 \
             WHERE id = $1 AND store_id = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(store_id)
        .bind(payment_status)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn summary(&self, store_id: Uuid) -> RepoResult<Summary> {
        let summary = sqlx::query_as::<_, Summary>(
            "SELECT COUNT(*) AS total_orders, \
             COALESCE(SUM(item_count), 0)::BIGINT AS total_items, \
             COALESCE(SUM(grand_total) FILTER (WHERE payment_status = 'completed'), 0)::BIGINT \
               AS total_earnings, \
             COUNT(DISTINCT user_id) AS total_customers \
             FROM orders WHERE store_id = $1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn stat_rows(
        &self,
        store_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<OrderStatRow>> {
        let rows = sqlx::query_as::<_, OrderStatRow>(
            "SELECT created_at, status, payment_status, grand_total, item_count, user_id \
             FROM orders WHERE store_id = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(store_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
