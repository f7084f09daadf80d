use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::DbPool,
    models::settings::{SETTINGS_ID, Settings, SettingsChanges},
    repositories::{PlatformRepository, RepoResult},
};

const SETTINGS_COLUMNS: &str = "id, name, url, tag_line, is_active, company_name, company_address, \
     company_city, company_country, company_postcode, company_email, company_phone, \
     is_sign_up_enabled, is_store_creation_enabled, created_at, updated_at";

#[derive(Clone)]
pub struct PgPlatformRepository {
    pool: DbPool,
}

impl PgPlatformRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlatformRepository for PgPlatformRepository {
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn settings(&self) -> RepoResult<Settings> {
        let settings = sqlx::query_as::<_, Settings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = $1"
        ))
        .bind(SETTINGS_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn update_settings(&self, changes: SettingsChanges, now: DateTime<Utc>) -> RepoResult<Settings> {
        let mut tx = self.pool.begin().await?;

        let mut settings = sqlx::query_as::<_, Settings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = $1 FOR UPDATE"
        ))
        .bind(SETTINGS_ID)
        .fetch_one(&mut *tx)
        .await?;

        settings.apply(changes, now);

        sqlx::query(
            "UPDATE settings SET name = $2, url = $3, tag_line = $4, is_active = $5, \
             company_name = $6, company_address = $7, company_city = $8, company_country = $9, \
             company_postcode = $10, company_email = $11, company_phone = $12, \
             is_sign_up_enabled = $13, is_store_creation_enabled = $14, updated_at = $15 \
             WHERE id = $1",
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
        .bind(settings.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(settings)
    }
}
