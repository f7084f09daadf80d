//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Validates the request into a typed input
//! 2. Scopes it to the caller (user or store, taken from middleware)
//! 3. Calls a repository and maps its error onto the entity's error code
//! 4. Wraps the result in the response envelope

/// Category endpoints
pub mod categories;
/// Coupon endpoints and the public coupon check
pub mod coupons;
/// Object upload and serving
pub mod files;
/// Health check
pub mod health;
/// Shopper and store order endpoints
pub mod orders;
/// Product catalogue and attributes
pub mod products;
/// Platform settings
pub mod settings;
/// Reporting
pub mod stats;
/// Stores, staff and store activation
pub mod stores;
/// Registration, sessions and profile
pub mod users;

#[cfg(test)]
mod tests;
