//! HTTP middleware components.
//!
//! Middleware run before route handlers. They authenticate requests,
//! resolve the caller's store and short-circuit unauthorized requests.

/// Session token authentication and the admin gate
pub mod auth;
/// Store staff membership and catalogue viewer
pub mod store;
