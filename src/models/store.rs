//! Stores (tenants) and their staff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a store record from the database.
///
/// Store names are unique across the platform. Inactive stores keep their
/// data but their staff cannot use the store endpoints and their products
/// disappear from the public catalogue.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postcode: String,
    pub email: String,
    pub phone: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(input: StoreInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            city: input.city,
            country: input.country,
            postcode: input.postcode,
            email: input.email,
            phone: input.phone,
            description: input.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreInput {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postcode: String,
    pub email: String,
    pub phone: String,
    pub description: Option<String>,
}

/// Role of a user inside a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "staff_permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffPermission {
    Owner,
    Manager,
    Staff,
}

impl StaffPermission {
    /// Roles that can be granted through the staff endpoints.
    /// Ownership is only assigned at store creation.
    pub fn parse_assignable(value: &str) -> Option<Self> {
        match value {
            "manager" => Some(Self::Manager),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

/// Membership row: `(store_id, user_id) → permission`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Staff {
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub permission: StaffPermission,
    pub created_at: DateTime<Utc>,
}

/// What the middleware needs to know about a staff member's store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StaffProfile {
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub permission: StaffPermission,
    pub is_store_active: bool,
}

/// Staff listing entry.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct StoreUserProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub permission: StaffPermission,
}

/// Validated staff addition.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStaff {
    pub email: String,
    pub permission: StaffPermission,
}
