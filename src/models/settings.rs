//! Global platform settings, a single row keyed [`SETTINGS_ID`].

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SETTINGS_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Settings {
    pub id: String,
    pub name: String,
    pub url: String,
    pub tag_line: String,
    pub is_active: bool,
    pub company_name: String,
    pub company_address: String,
    pub company_city: String,
    pub company_country: String,
    pub company_postcode: String,
    pub company_email: String,
    pub company_phone: String,

    /// Gates `POST /v1/users/register`
    pub is_sign_up_enabled: bool,

    /// Gates `POST /v1/stores`
    pub is_store_creation_enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Row inserted by the bootstrap. Sign-up and store creation start closed.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            id: SETTINGS_ID.to_string(),
            name: "Fin Shop".to_string(),
            url: "http://finshop.com".to_string(),
            tag_line: "Do it".to_string(),
            is_active: true,
            company_name: "Fin Shop Ltd.".to_string(),
            company_address: "Dhaka".to_string(),
            company_city: "Dhaka".to_string(),
            company_country: "Bangladesh".to_string(),
            company_postcode: "1207".to_string(),
            company_email: "admin@example.com".to_string(),
            company_phone: "0000000000".to_string(),
            is_sign_up_enabled: false,
            is_store_creation_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: SettingsChanges, now: DateTime<Utc>) {
        let SettingsChanges {
            name,
            url,
            tag_line,
            is_active,
            company_name,
            company_address,
            company_city,
            company_country,
            company_postcode,
            company_email,
            company_phone,
            is_sign_up_enabled,
            is_store_creation_enabled,
        } = changes;

        replace(&mut self.name, name);
        replace(&mut self.url, url);
        replace(&mut self.tag_line, tag_line);
        replace(&mut self.is_active, is_active);
        replace(&mut self.company_name, company_name);
        replace(&mut self.company_address, company_address);
        replace(&mut self.company_city, company_city);
        replace(&mut self.company_country, company_country);
        replace(&mut self.company_postcode, company_postcode);
        replace(&mut self.company_email, company_email);
        replace(&mut self.company_phone, company_phone);
        replace(&mut self.is_sign_up_enabled, is_sign_up_enabled);
        replace(&mut self.is_store_creation_enabled, is_store_creation_enabled);
        self.updated_at = now;
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub tag_line: Option<String>,
    pub is_active: Option<bool>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_city: Option<String>,
    pub company_country: Option<String>,
    pub company_postcode: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub is_sign_up_enabled: Option<bool>,
    pub is_store_creation_enabled: Option<bool>,
}
