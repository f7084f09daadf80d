//! Product data models and API response types.
//!
//! This module defines:
//! - `Product`: database entity, also the staff view
//! - `PublicProduct`: what shoppers see (no download link, no draft flag)
//! - `ProductView` / `ProductList`: the two response shapes, chosen by capability
//! - `ProductInput` / `ProductChanges`: validated create and update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a product record from the database.
///
/// # Database Table
///
/// Maps to the `products` table. Each product:
/// - Belongs to one store (via `store_id`)
/// - Has a SKU unique within that store
/// - Stores its price in minor currency units
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Product {
    pub id: Uuid,

    /// Owning store. Every staff query filters on it.
    pub store_id: Uuid,

    /// Optional category of the same store
    pub category_id: Option<Uuid>,

    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub unit: String,

    /// Price in minor units (cents)
    pub price: i64,

    pub stock: i32,
    pub is_shippable: bool,
    pub is_digital: bool,
    pub is_published: bool,

    /// Object key of the main image
    pub image: Option<String>,

    /// Object keys of further images, trimmed, never blank
    pub additional_images: Vec<String>,

    /// Only exposed to staff
    pub digital_download_link: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product for `store_id` from validated input.
    pub fn new(store_id: Uuid, input: ProductInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            category_id: input.category_id,
            name: input.name,
            description: input.description,
            sku: input.sku,
            unit: input.unit,
            price: input.price,
            stock: input.stock,
            is_shippable: input.is_shippable,
            is_digital: input.is_digital,
            is_published: input.is_published,
            image: input.image,
            additional_images: input.additional_images,
            digital_download_link: input.digital_download_link,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Absent fields stay untouched.
    pub fn apply(&mut self, changes: ProductChanges, now: DateTime<Utc>) {
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(sku) = changes.sku {
            self.sku = sku;
        }
        if let Some(unit) = changes.unit {
            self.unit = unit;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
        if let Some(is_shippable) = changes.is_shippable {
            self.is_shippable = is_shippable;
        }
        if let Some(is_digital) = changes.is_digital {
            self.is_digital = is_digital;
        }
        if let Some(is_published) = changes.is_published {
            self.is_published = is_published;
        }
        if let Some(image) = changes.image {
            self.image = Some(image);
        }
        if let Some(images) = changes.additional_images {
            self.additional_images = images;
        }
        if let Some(link) = changes.digital_download_link {
            self.digital_download_link = Some(link);
        }
        self.updated_at = now;
    }
}

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub unit: String,
    pub price: i64,
    pub stock: i32,
    pub is_shippable: bool,
    pub is_digital: bool,
    pub is_published: bool,
    pub image: Option<String>,
    pub additional_images: Vec<String>,
    pub digital_download_link: Option<String>,
}

/// Validated partial update.
///
/// `category_id` is doubly optional: `None` keeps the category,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub category_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub is_shippable: Option<bool>,
    pub is_digital: Option<bool>,
    pub is_published: Option<bool>,
    pub image: Option<String>,
    pub additional_images: Option<Vec<String>>,
    pub digital_download_link: Option<String>,
}

/// Key/value attribute of a product. Keys are unique per product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub product_id: Uuid,
    pub key: String,
    pub value: String,
}

/// Staff view of a single product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub attributes: Vec<ProductAttribute>,
}

/// Shopper view of a product: published, from an active store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct PublicProduct {
    pub id: Uuid,
    pub store_id: Uuid,
    pub store_name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub unit: String,
    pub price: i64,
    pub stock: i32,
    pub is_shippable: bool,
    pub is_digital: bool,
    pub image: Option<String>,
    pub additional_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublicProduct {
    /// Project a product into its public shape.
    pub fn from_product(product: &Product, store_name: &str, category_name: Option<String>) -> Self {
        Self {
            id: product.id,
            store_id: product.store_id,
            store_name: store_name.to_string(),
            category_id: product.category_id,
            category_name,
            name: product.name.clone(),
            description: product.description.clone(),
            sku: product.sku.clone(),
            unit: product.unit.clone(),
            price: product.price,
            stock: product.stock,
            is_shippable: product.is_shippable,
            is_digital: product.is_digital,
            image: product.image.clone(),
            additional_images: product.additional_images.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Shopper view of a single product.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProductDetails {
    #[serde(flatten)]
    pub product: PublicProduct,
    pub attributes: Vec<ProductAttribute>,
}

/// Single product response, shaped by the caller's capability.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProductView {
    Staff(ProductDetails),
    Public(PublicProductDetails),
}

/// Product list response, shaped by the caller's capability.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProductList {
    Staff(Vec<Product>),
    Public(Vec<PublicProduct>),
}

/// Popularity of a product, by number of orders containing it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct ProductStats {
    pub id: Uuid,
    pub name: String,
    pub number_of_orders: i64,
    pub quantity_sold: i64,
}
