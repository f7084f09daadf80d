//! First-run seeding.
//!
//! Inserts, in one transaction, the settings row, the two permission groups
//! and the admin account. Every insert is `ON CONFLICT DO NOTHING`, so the
//! seed can run on every deploy.

use chrono::Utc;

use crate::{
    db::DbPool,
    models::{
        settings::Settings,
        user::{ADMIN_GROUP_ID, NewUser, Permission, USER_GROUP_ID, User},
    },
    services::credentials,
};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// What a seed run actually inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub settings_created: bool,
    pub groups_created: u64,
    pub admin_created: bool,
}

/// Admin account owned by the platform group `admin`.
pub fn admin_user(email: &str, password_hash: String) -> User {
    let mut admin = User::new(
        NewUser {
            name: "Admin".to_string(),
            email: email.trim().to_lowercase(),
            password: String::new(),
            phone: None,
        },
        password_hash,
        Utc::now(),
    );
    admin.permission_id = ADMIN_GROUP_ID;
    admin
}

pub async fn seed(pool: &DbPool, admin_email: &str, admin_password: &str) -> Result<SeedReport, SeedError> {
    let password_hash =
        credentials::hash_password(admin_password).map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    let admin = admin_user(admin_email, password_hash);
    let settings = Settings::initial(Utc::now());

    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    let inserted = sqlx::query(
        "INSERT INTO settings (id, name, url, tag_line, is_active, company_name, company_address, \
         company_city, company_country, company_postcode, company_email, company_phone, \
         is_sign_up_enabled, is_store_creation_enabled, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&settings.id)
    .bind(&settings.name)
    .bind(&settings.url)
    .bind(&settings.tag_line)
    .bind(settings.is_active)
    .bind(&settings.company_name)
    .bind(&settings.company_address)
    .bind(&settings.company_city)
    .bind(&settings.company_country)
    .bind(&settings.company_postcode)
    .bind(&settings.company_email)
    .bind(&settings.company_phone)
    .bind(settings.is_sign_up_enabled)
    .bind(settings.is_store_creation_enabled)
    .bind(settings.created_at)
    .bind(settings.updated_at)
    .execute(&mut *tx)
    .await?;
    report.settings_created = inserted.rows_affected() == 1;

    for (id, permission) in [(ADMIN_GROUP_ID, Permission::Admin), (USER_GROUP_ID, Permission::User)] {
        let inserted = sqlx::query(
            "INSERT INTO user_permissions (id, permission) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(permission)
        .execute(&mut *tx)
        .await?;
        report.groups_created += inserted.rows_affected();
    }

    let inserted = sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, phone, profile_picture, status, \
         permission_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(admin.id)
    .bind(&admin.name)
    .bind(&admin.email)
    .bind(&admin.password_hash)
    .bind(&admin.phone)
    .bind(&admin.profile_picture)
    .bind(admin.status)
    .bind(admin.permission_id)
    .bind(admin.created_at)
    .bind(admin.updated_at)
    .execute(&mut *tx)
    .await?;
    report.admin_created = inserted.rows_affected() == 1;

    tx.commit().await?;

    tracing::info!(?report, "seed complete");

    Ok(report)
}
