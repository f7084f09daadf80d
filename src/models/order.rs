//! Order data models, pricing and statistics rows.
//!
//! This module defines:
//! - `Order` / `OrderItem`: database entities
//! - `OrderStatus` / `PaymentStatus`: Postgres enums
//! - `PlaceOrder`: validated checkout input
//! - `price_order`: pure pricing of a checkout against locked products
//! - `OrderStatRow` / `Summary`: raw rows and aggregates for the stats endpoints

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{coupon::Coupon, product::Product};

/// Fulfilment status of an order.
///
/// `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "shipping" => Some(Self::Shipping),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Reverted,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "reverted" => Some(Self::Reverted),
            _ => None,
        }
    }
}

/// Represents an order record from the database.
///
/// # Database Table
///
/// Maps to the `orders` table. Totals are computed once at checkout:
/// `grand_total = sub_total - discount`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub billing_address_id: String,
    pub shipping_address_id: Option<String>,
    pub payment_method_id: String,
    pub shipping_method_id: Option<String>,
    pub coupon_id: Option<Uuid>,
    pub sub_total: i64,
    pub discount: i64,
    pub grand_total: i64,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line of an order. Name and price are snapshots taken at checkout.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct OrderItem {
    pub order_id: Uuid,

    /// NULL once the product has been deleted
    pub product_id: Option<Uuid>,

    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub sub_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderDetails {
    /// A new pending order built from a priced checkout.
    pub fn placed(
        user_id: Uuid,
        request: &PlaceOrder,
        pricing: Pricing,
        coupon_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Self {
        let order = Order {
            id: Uuid::new_v4(),
            store_id: pricing.store_id,
            user_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            billing_address_id: request.billing_address_id.clone(),
            shipping_address_id: request.shipping_address_id.clone(),
            payment_method_id: request.payment_method_id.clone(),
            shipping_method_id: request.shipping_method_id.clone(),
            coupon_id,
            sub_total: pricing.sub_total,
            discount: pricing.discount,
            grand_total: pricing.grand_total,
            item_count: pricing.item_count,
            created_at: now,
            updated_at: now,
        };

        let items = pricing
            .items
            .into_iter()
            .map(|line| OrderItem {
                order_id: order.id,
                product_id: Some(line.product_id),
                name: line.name,
                price: line.price,
                quantity: line.quantity,
                sub_total: line.sub_total,
            })
            .collect();

        Self { order, items }
    }
}

/// One requested product and its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Validated checkout input.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub lines: Vec<OrderLine>,
    pub billing_address_id: String,
    pub shipping_address_id: Option<String>,
    pub payment_method_id: String,
    pub shipping_method_id: Option<String>,
    pub coupon_code: Option<String>,
}

impl PlaceOrder {
    pub fn product_ids(&self) -> Vec<Uuid> {
        self.lines.iter().map(|line| line.product_id).collect()
    }
}

/// Why a checkout cannot be priced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("product {0} is not available")]
    UnknownProduct(Uuid),

    #[error("all items must belong to the same store")]
    MixedStores,

    #[error("insufficient stock for product {0}")]
    InsufficientStock(Uuid),

    #[error("coupon is not available")]
    CouponUnavailable,

    #[error("order total is too large")]
    TotalOverflow,
}

impl PricingError {
    /// Request field the error is reported on.
    pub fn field(&self) -> &'static str {
        match self {
            PricingError::CouponUnavailable => "coupon_code",
            _ => "items",
        }
    }
}

/// Priced checkout, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub store_id: Uuid,
    pub items: Vec<PricedLine>,
    pub sub_total: i64,
    pub discount: i64,
    pub grand_total: i64,
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub sub_total: i64,
}

/// Price `lines` against the current (locked) product rows.
///
/// Every product must exist, be published and belong to the same store,
/// with enough stock for the requested quantity. The coupon, when given,
/// must be usable at `now` and belong to that store.
pub fn price_order(
    lines: &[OrderLine],
    products: &HashMap<Uuid, Product>,
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<Pricing, PricingError> {
    let mut stores = HashSet::new();
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let product = products
            .get(&line.product_id)
            .filter(|p| p.is_published)
            .ok_or(PricingError::UnknownProduct(line.product_id))?;

        if product.stock < line.quantity {
            return Err(PricingError::InsufficientStock(product.id));
        }

        stores.insert(product.store_id);
        items.push(PricedLine {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: line.quantity,
            sub_total: product
                .price
                .checked_mul(i64::from(line.quantity))
                .ok_or(PricingError::TotalOverflow)?,
        });
    }

    let store_id = match stores.len() {
        1 => stores.into_iter().next().ok_or(PricingError::MixedStores)?,
        _ => return Err(PricingError::MixedStores),
    };

    let sub_total = items
        .iter()
        .try_fold(0i64, |total, item| total.checked_add(item.sub_total))
        .ok_or(PricingError::TotalOverflow)?;
    let item_count = items
        .iter()
        .try_fold(0i64, |count, item| count.checked_add(i64::from(item.quantity)))
        .ok_or(PricingError::TotalOverflow)?;

    let discount = match coupon {
        Some(coupon) if coupon.store_id == store_id && coupon.is_usable_at(now) => {
            coupon.discount_for(sub_total)
        }
        Some(_) => return Err(PricingError::CouponUnavailable),
        None => 0,
    };

    Ok(Pricing {
        store_id,
        items,
        sub_total,
        discount,
        grand_total: sub_total - discount,
        item_count,
    })
}

/// Minimal projection of an order used by the stats aggregation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderStatRow {
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub grand_total: i64,
    pub item_count: i64,
    pub user_id: Uuid,
}

impl From<&Order> for OrderStatRow {
    fn from(order: &Order) -> Self {
        Self {
            created_at: order.created_at,
            status: order.status,
            payment_status: order.payment_status,
            grand_total: order.grand_total,
            item_count: order.item_count,
            user_id: order.user_id,
        }
    }
}

/// Aggregated order figures, optionally tagged with a bucket start.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Summary {
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub total_orders: i64,
    pub total_items: i64,
    /// Grand total of payment-completed orders
    pub total_earnings: i64,
    /// Distinct customers
    pub total_customers: i64,
}

impl Summary {
    pub fn for_rows(rows: &[&OrderStatRow]) -> Self {
        let customers: HashSet<Uuid> = rows.iter().map(|row| row.user_id).collect();

        Self {
            time: None,
            total_orders: rows.len() as i64,
            total_items: rows.iter().map(|row| row.item_count).sum(),
            total_earnings: rows
                .iter()
                .filter(|row| row.payment_status == PaymentStatus::Completed)
                .map(|row| row.grand_total)
                .sum(),
            total_customers: customers.len() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderStatusCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub shipping: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

/// Sum of grand totals per payment state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentEarnings {
    pub pending: i64,
    pub completed: i64,
    pub failed: i64,
    pub reverted: i64,
}
