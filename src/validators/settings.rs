use serde::Deserialize;
use validator::Validate;

use super::{structural_errors, trim_present};
use crate::{error::FieldErrors, models::settings::SettingsChanges};

/// Body of `PATCH /v1/settings`. Every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqSettingsUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(url(message = "url must be a URL"))]
    pub url: Option<String>,

    pub tag_line: Option<String>,
    pub is_active: Option<bool>,

    #[validate(length(min = 1, message = "company_name must not be empty"))]
    pub company_name: Option<String>,

    pub company_address: Option<String>,
    pub company_city: Option<String>,
    pub company_country: Option<String>,
    pub company_postcode: Option<String>,

    #[validate(email(message = "company_email must be a valid email address"))]
    pub company_email: Option<String>,

    pub company_phone: Option<String>,
    pub is_sign_up_enabled: Option<bool>,
    pub is_store_creation_enabled: Option<bool>,
}

pub fn validate(mut req: ReqSettingsUpdate) -> Result<SettingsChanges, FieldErrors> {
    for field in [&mut req.name, &mut req.url, &mut req.company_name, &mut req.company_email] {
        trim_present(field);
    }
    let errors = structural_errors(&req);

    errors.into_result(SettingsChanges {
        name: req.name,
        url: req.url,
        tag_line: req.tag_line,
        is_active: req.is_active,
        company_name: req.company_name,
        company_address: req.company_address,
        company_city: req.company_city,
        company_country: req.company_country,
        company_postcode: req.company_postcode,
        company_email: req.company_email,
        company_phone: req.company_phone,
        is_sign_up_enabled: req.is_sign_up_enabled,
        is_store_creation_enabled: req.is_store_creation_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_and_email_are_checked_when_present() {
        let errors = validate(ReqSettingsUpdate {
            url: Some("finshop".to_string()),
            company_email: Some("nobody".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(errors.contains("url"));
        assert!(errors.contains("company_email"));
    }

    #[test]
    fn names_cannot_be_whitespace() {
        let errors = validate(ReqSettingsUpdate {
            name: Some("  ".to_string()),
            company_name: Some(" ".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(errors.contains("name"));
        assert!(errors.contains("company_name"));
    }

    #[test]
    fn toggles_pass_through() {
        let changes = validate(ReqSettingsUpdate {
            is_sign_up_enabled: Some(true),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(changes.is_sign_up_enabled, Some(true));
        assert_eq!(changes.name, None);
    }
}
