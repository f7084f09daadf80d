use async_trait::async_trait;
use uuid::Uuid;

use super::expect_affected;
use crate::{
    db::DbPool,
    models::{
        Page,
        category::{Category, CategoryStats},
    },
    repositories::{CategoryRepository, RepoResult},
};

const CATEGORY_COLUMNS: &str = "id, store_id, name, description, image, created_at, updated_at";

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: DbPool,
}

impl PgCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, category: &Category) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO categories (id, store_id, name, description, image, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(category.id)
        .bind(category.store_id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, store_id: Uuid, category_id: Uuid) -> RepoResult<Category> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND store_id = $2"
        ))
        .bind(category_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update(&self, category: &Category) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE categories SET name = $3, description = $4, image = $5, updated_at = $6 \
             WHERE id = $1 AND store_id = $2",
        )
        .bind(category.id)
        .bind(category.store_id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn delete(&self, store_id: Uuid, category_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND store_id = $2")
            .bind(category_id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        expect_affected(result.rows_affected())
    }

    async fn list(&self, store_id: Option<Uuid>, page: Page) -> RepoResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT c.id, c.store_id, c.name, c.description, c.image, c.created_at, c.updated_at \
             FROM categories c JOIN stores s ON s.id = c.store_id \
             WHERE ($1::UUID IS NULL AND s.is_active) OR c.store_id = $1 \
             ORDER BY c.name, c.id OFFSET $2 LIMIT $3",
        )
        .bind(store_id)
        .bind(page.from)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn stats(&self, store_id: Option<Uuid>, limit: i64) -> RepoResult<Vec<CategoryStats>> {
        let stats = sqlx::query_as::<_, CategoryStats>(
            "SELECT c.id, c.name, COUNT(p.id) AS number_of_products \
             FROM categories c \
             JOIN stores s ON s.id = c.store_id \
             LEFT JOIN products p ON p.category_id = c.id \
             WHERE ($1::UUID IS NULL AND s.is_active) OR c.store_id = $1 \
             GROUP BY c.id, c.name \
             ORDER BY number_of_products DESC, c.name \
             LIMIT $2",
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}
