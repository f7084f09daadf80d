use std::collections::HashSet;

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{non_blank, structural_errors, trim};
use crate::{
    error::FieldErrors,
    models::order::{OrderLine, OrderStatus, PaymentStatus, PlaceOrder},
};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqOrderItem {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,

    #[validate(range(min = 1, max = 10_000_000, message = "quantity must be between 1 and 10000000"))]
    pub quantity: i32,
}

/// Body of `POST /v1/orders`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqOrderCreate {
    #[validate(nested)]
    pub items: Vec<ReqOrderItem>,

    #[validate(length(min = 1, message = "billing_address_id is required"))]
    pub billing_address_id: String,

    pub shipping_address_id: Option<String>,

    #[validate(length(min = 1, message = "payment_method_id is required"))]
    pub payment_method_id: String,

    pub shipping_method_id: Option<String>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReqOrderStatus {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReqPaymentStatus {
    pub payment_status: String,
}

pub fn validate_create(mut req: ReqOrderCreate) -> Result<PlaceOrder, FieldErrors> {
    trim(&mut req.billing_address_id);
    trim(&mut req.payment_method_id);
    for item in &mut req.items {
        trim(&mut item.id);
    }
    let mut errors = structural_errors(&req);

    if req.items.is_empty() {
        errors.add("items", "items are required");
    }

    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(req.items.len());
    for (index, item) in req.items.iter().enumerate() {
        if item.id.is_empty() {
            continue;
        }
        match Uuid::parse_str(&item.id) {
            Ok(product_id) => {
                if !seen.insert(product_id) {
                    errors.add(format!("items[{index}].id"), "product is listed twice");
                }
                lines.push(OrderLine {
                    product_id,
                    quantity: item.quantity,
                });
            }
            Err(_) => errors.add(format!("items[{index}].id"), "id must be a UUID"),
        }
    }

    errors.into_result(PlaceOrder {
        lines,
        billing_address_id: req.billing_address_id,
        shipping_address_id: non_blank(req.shipping_address_id),
        payment_method_id: req.payment_method_id,
        shipping_method_id: non_blank(req.shipping_method_id),
        coupon_code: non_blank(req.coupon_code),
    })
}

pub fn validate_status(req: ReqOrderStatus) -> Result<OrderStatus, FieldErrors> {
    OrderStatus::parse(req.status.trim()).ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add(
            "status",
            "status must be one of pending, confirmed, shipping, delivered, cancelled",
        );
        errors
    })
}

pub fn validate_payment_status(req: ReqPaymentStatus) -> Result<PaymentStatus, FieldErrors> {
    PaymentStatus::parse(req.payment_status.trim()).ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add(
            "payment_status",
            "payment_status must be one of pending, completed, failed, reverted",
        );
        errors
    })
}
