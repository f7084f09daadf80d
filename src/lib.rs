//! Shopicano: multi-tenant e-commerce backend.
//!
//! Stores, products, categories, coupons, orders, users and staff, plus
//! reporting statistics, exposed as a JSON HTTP API over PostgreSQL.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, behind repository traits
//! - **Authentication**: opaque session tokens, stored as SHA-256 hashes
//! - **Format**: JSON envelope `{code, title, data, errors}`

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod validators;
