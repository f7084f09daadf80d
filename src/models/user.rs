//! User data models and permission groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed id of the `admin` permission group.
pub const ADMIN_GROUP_ID: Uuid = Uuid::from_u128(0x5f3a_9c1e_0b7d_4e2a_9d61_1a2b_3c4d_0001);

/// Fixed id of the `user` permission group. New sign-ups join it.
pub const USER_GROUP_ID: Uuid = Uuid::from_u128(0x5f3a_9c1e_0b7d_4e2a_9d61_1a2b_3c4d_0002);

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// Platform-level permission of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Admin,
    User,
}

/// Represents a user record from the database.
///
/// # Security
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub status: UserStatus,
    pub permission_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A new active member of the `user` group.
    pub fn new(input: NewUser, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash,
            phone: input.phone,
            profile_picture: None,
            status: UserStatus::Active,
            permission_id: USER_GROUP_ID,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(phone) = changes.phone {
            self.phone = Some(phone);
        }
        if let Some(picture) = changes.profile_picture {
            self.profile_picture = Some(picture);
        }
        self.updated_at = now;
    }
}

/// Validated sign-up input. The password is still in clear text here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
}

/// Identity resolved from an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub permission: Permission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new(
            NewUser {
                name: "Fin".to_string(),
                email: "fin@example.com".to_string(),
                password: "secret-pass".to_string(),
                phone: None,
            },
            "$argon2id$v=19$...".to_string(),
            Utc::now(),
        );

        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["status"], "active");
        assert_eq!(user.permission_id, USER_GROUP_ID);
    }
}
