//! Product request bodies.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{clean_list, non_blank, structural_errors, trim, trim_present};
use crate::{
    error::FieldErrors,
    models::product::{ProductChanges, ProductInput},
};

/// Upper bound of a unit price in minor units. Keeps order totals far from
/// `i64::MAX` for any realistic quantity.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// Body of `POST /v1/products`.
///
/// Missing strings default to empty and fail the length rules, so every
/// absent required field shows up in the error map.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqProductCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "sku must be 1 to 100 characters"))]
    pub sku: String,

    #[validate(length(min = 1, max = 50, message = "unit must be 1 to 50 characters"))]
    pub unit: String,

    #[validate(range(min = 0, max = MAX_PRICE, message = "price must be between 0 and 1000000000000"))]
    pub price: i64,

    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i32,

    pub category_id: Option<String>,
    pub is_shippable: bool,
    pub is_digital: bool,
    pub is_published: bool,
    pub image: Option<String>,
    pub additional_images: Vec<String>,

    #[validate(url(message = "digital_download_link must be a URL"))]
    pub digital_download_link: Option<String>,
}

/// Body of `PATCH /v1/products/{id}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqProductUpdate {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "sku must be 1 to 100 characters"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 50, message = "unit must be 1 to 50 characters"))]
    pub unit: Option<String>,

    #[validate(range(min = 0, max = MAX_PRICE, message = "price must be between 0 and 1000000000000"))]
    pub price: Option<i64>,

    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: Option<i32>,

    pub category_id: Option<String>,
    pub is_shippable: Option<bool>,
    pub is_digital: Option<bool>,
    pub is_published: Option<bool>,
    pub image: Option<String>,
    pub additional_images: Option<Vec<String>>,

    #[validate(url(message = "digital_download_link must be a URL"))]
    pub digital_download_link: Option<String>,
}

/// Body of `PUT /v1/products/{id}/attributes`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqProductAttribute {
    #[validate(length(min = 1, max = 100, message = "key must be 1 to 100 characters"))]
    pub key: String,

    #[validate(length(min = 1, max = 500, message = "value must be 1 to 500 characters"))]
    pub value: String,
}

/// `""` means "no category"; anything else must be a UUID.
fn parse_category(raw: &str, errors: &mut FieldErrors) -> Option<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add("category_id", "category_id must be a UUID");
            None
        }
    }
}

pub fn validate_create(mut req: ReqProductCreate) -> Result<ProductInput, FieldErrors> {
    trim(&mut req.name);
    trim(&mut req.sku);
    trim(&mut req.unit);
    req.digital_download_link = non_blank(req.digital_download_link.take());

    let mut errors = structural_errors(&req);

    let category_id = req
        .category_id
        .as_deref()
        .and_then(|raw| parse_category(raw, &mut errors));

    if req.is_digital && req.digital_download_link.is_none() {
        errors.add(
            "digital_download_link",
            "digital products require a download link",
        );
    }

    errors.into_result(ProductInput {
        category_id,
        name: req.name,
        description: non_blank(req.description),
        sku: req.sku,
        unit: req.unit,
        price: req.price,
        stock: req.stock,
        is_shippable: req.is_shippable,
        is_digital: req.is_digital,
        is_published: req.is_published,
        image: non_blank(req.image),
        additional_images: clean_list(req.additional_images),
        digital_download_link: req.digital_download_link,
    })
}

/// Validate a partial update.
///
/// The "digital products need a link" rule can only be checked against the
/// merged record, see `handlers::products::update_product`.
pub fn validate_update(mut req: ReqProductUpdate) -> Result<ProductChanges, FieldErrors> {
    trim_present(&mut req.name);
    trim_present(&mut req.sku);
    trim_present(&mut req.unit);
    req.digital_download_link = non_blank(req.digital_download_link.take());

    let mut errors = structural_errors(&req);

    let category_id = req
        .category_id
        .as_deref()
        .map(|raw| parse_category(raw, &mut errors));

    errors.into_result(ProductChanges {
        category_id,
        name: req.name,
        description: req.description,
        sku: req.sku,
        unit: req.unit,
        price: req.price,
        stock: req.stock,
        is_shippable: req.is_shippable,
        is_digital: req.is_digital,
        is_published: req.is_published,
        image: non_blank(req.image),
        additional_images: req.additional_images.map(clean_list),
        digital_download_link: req.digital_download_link,
    })
}

pub fn validate_attribute(mut req: ReqProductAttribute) -> Result<(String, String), FieldErrors> {
    trim(&mut req.key);
    trim(&mut req.value);
    let errors = structural_errors(&req);
    errors.into_result((req.key, req.value))
}
