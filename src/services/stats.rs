//! Order statistics over rolling time windows.
//!
//! A timeline selects a fixed number of equally wide buckets ending at
//! "now". Buckets are computed arithmetically from a single captured
//! instant; there is no calendar awareness.
//!
//! ```text
//!   timeline  buckets  width
//!   w         7        1 day
//!   m         5        7 days
//!   y         12       30 days
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::order::{
    OrderStatRow, OrderStatus, OrderStatusCounts, PaymentEarnings, PaymentStatus, Summary,
};

/// Format of bucket keys. Fixed width, so lexical order is chronological.
pub const BUCKET_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    Weekly,
    Monthly,
    Yearly,
}

impl Timeline {
    /// `w`, `m` or `y`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "w" => Some(Timeline::Weekly),
            "m" => Some(Timeline::Monthly),
            "y" => Some(Timeline::Yearly),
            _ => None,
        }
    }

    pub fn bucket_count(self) -> i32 {
        match self {
            Timeline::Weekly => 7,
            Timeline::Monthly => 5,
            Timeline::Yearly => 12,
        }
    }

    pub fn bucket_width(self) -> Duration {
        match self {
            Timeline::Weekly => Duration::days(1),
            Timeline::Monthly => Duration::days(7),
            Timeline::Yearly => Duration::days(30),
        }
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Bucket {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub fn key(&self) -> String {
        self.start.format(BUCKET_KEY_FORMAT).to_string()
    }
}

/// Buckets for `timeline` ending at `now`, ascending by start.
pub fn buckets(timeline: Timeline, now: DateTime<Utc>) -> Vec<Bucket> {
    let width = timeline.bucket_width();

    (0..timeline.bucket_count())
        .rev()
        .map(|i| {
            let end = now - width * i;
            Bucket {
                start: end - width,
                end,
            }
        })
        .collect()
}

/// Full response of the order stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatsReport {
    /// All-time summary of the store.
    pub report: Summary,
    /// One summary per bucket, ascending by bucket start.
    pub reports_by_time: Vec<Summary>,
    pub orders_by_time: BTreeMap<String, OrderStatusCounts>,
    pub earnings_by_time: BTreeMap<String, PaymentEarnings>,
}

/// Distribute `rows` over `buckets` and build the report.
///
/// Rows outside every bucket are ignored. Each bucket gets an entry even
/// when it has no orders.
pub fn aggregate(report: Summary, buckets: &[Bucket], rows: &[OrderStatRow]) -> OrderStatsReport {
    let mut reports_by_time = Vec::with_capacity(buckets.len());
    let mut orders_by_time = BTreeMap::new();
    let mut earnings_by_time = BTreeMap::new();

    for bucket in buckets {
        let in_bucket: Vec<&OrderStatRow> =
            rows.iter().filter(|row| bucket.contains(row.created_at)).collect();

        let mut summary = Summary::for_rows(&in_bucket);
        summary.time = Some(bucket.key());

        let mut counts = OrderStatusCounts::default();
        let mut earnings = PaymentEarnings::default();

        for row in &in_bucket {
            match row.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Confirmed => counts.confirmed += 1,
                OrderStatus::Shipping => counts.shipping += 1,
                OrderStatus::Delivered => counts.delivered += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }

            match row.payment_status {
                PaymentStatus::Pending => earnings.pending += row.grand_total,
                PaymentStatus::Completed => earnings.completed += row.grand_total,
                PaymentStatus::Failed => earnings.failed += row.grand_total,
                PaymentStatus::Reverted => earnings.reverted += row.grand_total,
            }
        }

        orders_by_time.insert(bucket.key(), counts);
        earnings_by_time.insert(bucket.key(), earnings);
        reports_by_time.push(summary);
    }

    OrderStatsReport {
        report,
        reports_by_time,
        orders_by_time,
        earnings_by_time,
    }
}
