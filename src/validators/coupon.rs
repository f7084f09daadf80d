use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use super::structural_errors;
use crate::{
    error::FieldErrors,
    models::coupon::{Coupon, CouponChanges, CouponInput},
};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqCouponCreate {
    #[validate(length(min = 3, max = 50, message = "code must be 3 to 50 characters"))]
    pub code: String,

    #[validate(range(min = 1, message = "discount_amount must be positive"))]
    pub discount_amount: i64,

    pub is_flat_discount: bool,

    #[validate(range(min = 0, message = "max_discount must not be negative"))]
    pub max_discount: i64,

    #[validate(range(min = 0, message = "max_usage must not be negative"))]
    pub max_usage: i32,

    pub is_active: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqCouponUpdate {
    #[validate(length(min = 3, max = 50, message = "code must be 3 to 50 characters"))]
    pub code: Option<String>,

    #[validate(range(min = 1, message = "discount_amount must be positive"))]
    pub discount_amount: Option<i64>,

    pub is_flat_discount: Option<bool>,

    #[validate(range(min = 0, message = "max_discount must not be negative"))]
    pub max_discount: Option<i64>,

    #[validate(range(min = 0, message = "max_usage must not be negative"))]
    pub max_usage: Option<i32>,

    pub is_active: Option<bool>,
    pub start_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

fn check_code(code: &str, errors: &mut FieldErrors) {
    if code.chars().any(char::is_whitespace) {
        errors.add("code", "code must not contain whitespace");
    }
}

fn check_percentage(amount: i64, is_flat: bool, errors: &mut FieldErrors) {
    if !is_flat && amount > 100 {
        errors.add("discount_amount", "percentage discount must not exceed 100");
    }
}

fn check_window(start_at: DateTime<Utc>, expire_at: DateTime<Utc>, errors: &mut FieldErrors) {
    if expire_at <= start_at {
        errors.add("expire_at", "expire_at must be after start_at");
    }
}

pub fn validate_create(req: ReqCouponCreate) -> Result<CouponInput, FieldErrors> {
    let mut errors = structural_errors(&req);

    check_code(&req.code, &mut errors);
    check_percentage(req.discount_amount, req.is_flat_discount, &mut errors);

    if req.start_at.is_none() {
        errors.add("start_at", "start_at is required");
    }
    if req.expire_at.is_none() {
        errors.add("expire_at", "expire_at is required");
    }

    match (req.start_at, req.expire_at) {
        (Some(start_at), Some(expire_at)) => {
            check_window(start_at, expire_at, &mut errors);
            errors.into_result(CouponInput {
                code: req.code,
                discount_amount: req.discount_amount,
                is_flat_discount: req.is_flat_discount,
                max_discount: req.max_discount,
                max_usage: req.max_usage,
                is_active: req.is_active,
                start_at,
                expire_at,
            })
        }
        _ => Err(errors),
    }
}

/// Rules that depend on the stored coupon (percentage cap, window order)
/// are checked again by the repository on the merged record.
pub fn validate_update(req: ReqCouponUpdate) -> Result<CouponChanges, FieldErrors> {
    let mut errors = structural_errors(&req);

    if let Some(code) = &req.code {
        check_code(code, &mut errors);
    }
    if let (Some(amount), Some(flat)) = (req.discount_amount, req.is_flat_discount) {
        check_percentage(amount, flat, &mut errors);
    }
    if let (Some(start_at), Some(expire_at)) = (req.start_at, req.expire_at) {
        check_window(start_at, expire_at, &mut errors);
    }

    errors.into_result(CouponChanges {
        code: req.code,
        discount_amount: req.discount_amount,
        is_flat_discount: req.is_flat_discount,
        max_discount: req.max_discount,
        max_usage: req.max_usage,
        is_active: req.is_active,
        start_at: req.start_at,
        expire_at: req.expire_at,
    })
}

/// Re-check the merged coupon after a partial update.
pub fn check_merged(coupon: &Coupon) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_percentage(coupon.discount_amount, coupon.is_flat_discount, &mut errors);
    check_window(coupon.start_at, coupon.expire_at, &mut errors);
    errors.into_result(())
}
