//! Coupon data models.
//!
//! A coupon is either a flat amount off the sub total or a percentage of it,
//! optionally capped by `max_discount`. Coupons can be used a limited number
//! of times (`max_usage`, 0 means unlimited) inside a validity window.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a coupon record from the database.
///
/// # Database Table
///
/// Maps to the `coupons` table. `code` is unique within a store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Coupon {
    pub id: Uuid,
    pub store_id: Uuid,
    pub code: String,

    /// Minor units when flat, percent otherwise
    pub discount_amount: i64,

    pub is_flat_discount: bool,

    /// Cap for percentage coupons. 0 means no cap.
    pub max_discount: i64,

    /// 0 means unlimited
    pub max_usage: i32,

    pub usage_count: i32,
    pub is_active: bool,
    pub start_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    pub fn new(store_id: Uuid, input: CouponInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            code: input.code,
            discount_amount: input.discount_amount,
            is_flat_discount: input.is_flat_discount,
            max_discount: input.max_discount,
            max_usage: input.max_usage,
            usage_count: 0,
            is_active: input.is_active,
            start_at: input.start_at,
            expire_at: input.expire_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Absent fields stay untouched.
    pub fn apply(&mut self, changes: CouponChanges, now: DateTime<Utc>) {
        if let Some(code) = changes.code {
            self.code = code;
        }
        if let Some(amount) = changes.discount_amount {
            self.discount_amount = amount;
        }
        if let Some(flat) = changes.is_flat_discount {
            self.is_flat_discount = flat;
        }
        if let Some(max_discount) = changes.max_discount {
            self.max_discount = max_discount;
        }
        if let Some(max_usage) = changes.max_usage {
            self.max_usage = max_usage;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(start_at) = changes.start_at {
            self.start_at = start_at;
        }
        if let Some(expire_at) = changes.expire_at {
            self.expire_at = expire_at;
        }
        self.updated_at = now;
    }

    /// Active, inside its window and not used up.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_at <= now
            && now < self.expire_at
            && (self.max_usage == 0 || self.usage_count < self.max_usage)
    }

    /// Discount granted on `sub_total`, never more than `sub_total`.
    pub fn discount_for(&self, sub_total: i64) -> i64 {
        let discount = if self.is_flat_discount {
            self.discount_amount
        } else {
            let percent = sub_total.saturating_mul(self.discount_amount) / 100;
            if self.max_discount > 0 {
                percent.min(self.max_discount)
            } else {
                percent
            }
        };

        discount.clamp(0, sub_total.max(0))
    }
}

/// Validated create input.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponInput {
    pub code: String,
    pub discount_amount: i64,
    pub is_flat_discount: bool,
    pub max_discount: i64,
    pub max_usage: i32,
    pub is_active: bool,
    pub start_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponChanges {
    pub code: Option<String>,
    pub discount_amount: Option<i64>,
    pub is_flat_discount: Option<bool>,
    pub max_discount: Option<i64>,
    pub max_usage: Option<i32>,
    pub is_active: Option<bool>,
    pub start_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

/// Answer of the public coupon check.
#[derive(Debug, Clone, Serialize)]
pub struct CouponAvailability {
    pub code: String,
    pub is_available: bool,
    pub discount_amount: i64,
    pub is_flat_discount: bool,
    pub max_discount: i64,
    pub expire_at: DateTime<Utc>,
}

impl CouponAvailability {
    pub fn of(coupon: &Coupon, now: DateTime<Utc>) -> Self {
        Self {
            code: coupon.code.clone(),
            is_available: coupon.is_usable_at(now),
            discount_amount: coupon.discount_amount,
            is_flat_discount: coupon.is_flat_discount,
            max_discount: coupon.max_discount,
            expire_at: coupon.expire_at,
        }
    }
}
