use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{contains_pattern, expect_affected};
use crate::{
    db::DbPool,
    models::{
        Page,
        product::{Product, ProductAttribute, ProductStats, PublicProduct},
    },
    repositories::{ProductRepository, RepoError, RepoResult},
};

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, name, description, sku, unit, price, stock, \
     is_shippable, is_digital, is_published, image, additional_images, digital_download_link, \
     created_at, updated_at";

/// Public projection joined with store and category names.
const PUBLIC_SELECT: &str = "SELECT p.id, p.store_id, s.name AS store_name, p.category_id, \
     c.name AS category_name, p.name, p.description, p.sku, p.unit, p.price, p.stock, \
     p.is_shippable, p.is_digital, p.image, p.additional_images, p.created_at, p.updated_at \
     FROM products p \
     JOIN stores s ON s.id = p.store_id \
     LEFT JOIN categories c ON c.id = p.category_id \
     WHERE p.is_published AND s.is_active";

#[derive(Clone)]
pub struct PgProductRepository {
    pool: DbPool,
}

impl PgProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// A product may only reference a category of its own store.
async fn check_category(tx: &mut Transaction<'_, Postgres>, product: &Product) -> RepoResult<()> {
    let Some(category_id) = product.category_id else {
        return Ok(());
    };

    let same_store: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND store_id = $2)",
    )
    .bind(category_id)
    .bind(product.store_id)
    .fetch_one(&mut **tx)
    .await?;

    if same_store {
        Ok(())
    } else {
        Err(RepoError::rejected("category_id", "category does not exist in this store"))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &Product) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        check_category(&mut tx, product).await?;

        sqlx::query(
            "INSERT INTO products (id, store_id, category_id, name, description, sku, unit, price, \
             stock, is_shippable, is_digital, is_published, image, additional_images, \
             digital_download_link, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(product.id)
        .bind(product.store_id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(&product.unit)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.is_shippable)
        .bind(product.is_digital)
        .bind(product.is_published)
        .bind(&product.image)
        .bind(&product.additional_images)
        .bind(&product.digital_download_link)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn get(&self, store_id: Uuid, product_id: Uuid) -> RepoResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND store_id = $2"
        ))
        .bind(product_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn details(&self, product_id: Uuid) -> RepoResult<PublicProduct> {
        let product = sqlx::query_as::<_, PublicProduct>(&format!("{PUBLIC_SELECT} AND p.id = $1"))
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    async fn update(&self, product: &Product) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        check_category(&mut tx, product).await?;

        let result = sqlx::query(
            "UPDATE products SET category_id = $3, name = $4, description = $5, sku = $6, \
             unit = $7, price = $8, stock = $9, is_shippable = $10, is_digital = $11, \
             is_published = $12, image = $13, additional_images = $14, \
             digital_download_link = $15, updated_at = $16 \
             WHERE id = $1 AND store_id = $2",
        )
        .bind(product.id)
        .bind(product.store_id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(&product.unit)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.is_shippable)
        .bind(product.is_digital)
        .bind(product.is_published)
        .bind(&product.image)
        .bind(&product.additional_images)
        .bind(&product.digital_download_link)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        expect_affected(result.rows_affected())?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, store_id: Uuid, product_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(product_id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        expect_affected(result.rows_affected())
    }

    async fn list(&self, query: Option<&str>, page: Page) -> RepoResult<Vec<PublicProduct>> {
        let products = sqlx::query_as::<_, PublicProduct>(&format!(
            "{PUBLIC_SELECT} AND ($1::TEXT IS NULL OR p.name ILIKE $1 OR p.sku ILIKE $1) \
             ORDER BY p.created_at DESC, p.id OFFSET $2 LIMIT $3"
        ))
        .bind(query.map(contains_pattern))
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        query: Option<&str>,
        page: Page,
    ) -> RepoResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE store_id = $1 AND ($2::TEXT IS NULL OR name ILIKE $2 OR sku ILIKE $2) \
             ORDER BY created_at DESC, id OFFSET $3 LIMIT $4"
        ))
        .bind(store_id)
        .bind(query.map(contains_pattern))
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn attributes(&self, product_id: Uuid) -> RepoResult<Vec<ProductAttribute>> {
        let attributes = sqlx::query_as::<_, ProductAttribute>(
            "SELECT product_id, key, value FROM product_attributes WHERE product_id = $1 ORDER BY key",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attributes)
    }

    async fn add_attribute(&self, store_id: Uuid, attribute: &ProductAttribute) -> RepoResult<()> {
        // The SELECT scopes the insert to the caller's store
        let result = sqlx::query(
            "INSERT INTO product_attributes (product_id, key, value) \
             SELECT id, $3, $4 FROM products WHERE id = $1 AND store_id = $2",
        )
        .bind(attribute.product_id)
        .bind(store_id)
        .bind(&attribute.key)
        .bind(&attribute.value)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn remove_attribute(&self, store_id: Uuid, product_id: Uuid, key: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM product_attributes pa USING products p \
             WHERE pa.product_id = p.id AND p.id = $1 AND p.store_id = $2 AND pa.key = $3",
        )
        .bind(product_id)
        .bind(store_id)
        .bind(key)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn stats(&self, store_id: Option<Uuid>, limit: i64) -> RepoResult<Vec<ProductStats>> {
        let stats = sqlx::query_as::<_, ProductStats>(
            "SELECT p.id, p.name, COUNT(DISTINCT oi.order_id) AS number_of_orders, \
             COALESCE(SUM(oi.quantity), 0)::BIGINT AS quantity_sold \
             FROM products p \
             JOIN stores s ON s.id = p.store_id \
             LEFT JOIN order_items oi ON oi.product_id = p.id \
             WHERE ($1::UUID IS NULL AND p.is_published AND s.is_active) OR p.store_id = $1 \
             GROUP BY p.id, p.name \
             ORDER BY number_of_orders DESC, quantity_sold DESC, p.name \
             LIMIT $2",
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}
