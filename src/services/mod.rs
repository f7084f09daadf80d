//! Business logic services.
//!
//! Services hold logic that is neither HTTP glue nor persistence: password
//! and token handling, object storage, image resizing, stats bucketing and
//! first-run seeding.

pub mod bootstrap;
pub mod credentials;
pub mod image;
pub mod stats;
pub mod storage;
