//! Category data models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a category record from the database.
///
/// Names are unique within a store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub store_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(store_id: Uuid, input: CategoryInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            name: input.name,
            description: input.description,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields.
    pub fn apply(&mut self, input: CategoryInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.image = input.image;
        self.updated_at = now;
    }
}

/// Validated create/update input.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Number of products per category.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct CategoryStats {
    pub id: Uuid,
    pub name: String,
    pub number_of_products: i64,
}
