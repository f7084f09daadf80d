//! Data models representing database entities and their API shapes.

/// Product categories
pub mod category;
/// Store coupons
pub mod coupon;
/// Orders, order items and order statistics rows
pub mod order;
/// Products and product attributes
pub mod product;
/// Login sessions
pub mod session;
/// Global platform settings
pub mod settings;
/// Stores and staff
pub mod store;
/// Users and permission groups
pub mod user;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Offset pagination window.
///
/// `from = (page - 1) * limit`, pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub from: i64,
    pub limit: i64,
}

impl Page {
    /// Build a window from raw `page` / `limit` query values.
    ///
    /// Missing, non-numeric or non-positive values fall back to page 1 and
    /// limit 10.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        fn positive(value: Option<&str>) -> Option<i64> {
            value
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v > 0)
        }

        let page = positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = positive(limit).unwrap_or(DEFAULT_LIMIT);

        Self {
            from: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }

    /// First `limit` records.
    pub fn first(limit: i64) -> Self {
        Self { from: 0, limit }
    }

    /// Apply the window to an in-memory sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.from).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(DEFAULT_LIMIT)
    }
}
