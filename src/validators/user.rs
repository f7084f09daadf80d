use serde::Deserialize;
use validator::Validate;

use super::{non_blank, structural_errors, trim, trim_present};
use crate::{
    error::FieldErrors,
    models::user::{Credentials, NewUser, ProfileChanges},
};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqRegister {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "password must be 8 to 128 characters"))]
    pub password: String,

    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqLogin {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqRefreshToken {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqProfileUpdate {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
}

/// Emails are compared case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_register(mut req: ReqRegister) -> Result<NewUser, FieldErrors> {
    trim(&mut req.name);
    trim(&mut req.email);
    let errors = structural_errors(&req);

    errors.into_result(NewUser {
        name: req.name,
        email: normalize_email(&req.email),
        password: req.password,
        phone: non_blank(req.phone),
    })
}

pub fn validate_login(mut req: ReqLogin) -> Result<Credentials, FieldErrors> {
    trim(&mut req.email);
    let errors = structural_errors(&req);

    errors.into_result(Credentials {
        email: normalize_email(&req.email),
        password: req.password,
    })
}

pub fn validate_refresh(mut req: ReqRefreshToken) -> Result<String, FieldErrors> {
    trim(&mut req.refresh_token);
    let errors = structural_errors(&req);
    errors.into_result(req.refresh_token)
}

pub fn validate_profile(mut req: ReqProfileUpdate) -> Result<ProfileChanges, FieldErrors> {
    trim_present(&mut req.name);
    let errors = structural_errors(&req);

    errors.into_result(ProfileChanges {
        name: req.name,
        phone: non_blank(req.phone),
        profile_picture: non_blank(req.profile_picture),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_collects_all_errors() {
        let errors = validate_register(ReqRegister {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            phone: None,
        })
        .unwrap_err();

        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn emails_are_normalized() {
        let user = validate_register(ReqRegister {
            name: "Fin".to_string(),
            email: " Fin@Example.COM ".to_string(),
            password: "long enough".to_string(),
            phone: Some("  ".to_string()),
        })
        .unwrap();

        assert_eq!(user.email, "fin@example.com");
        assert_eq!(user.phone, None);
    }

    #[test]
    fn profile_name_cannot_be_blanked() {
        let errors = validate_profile(ReqProfileUpdate {
            name: Some(String::new()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(errors.contains("name"));

        let errors = validate_profile(ReqProfileUpdate {
            name: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.contains("name"));
    }

    #[test]
    fn whitespace_credentials_are_missing() {
        let errors = validate_register(ReqRegister {
            name: "   ".to_string(),
            email: "fin@example.com".to_string(),
            password: "long enough".to_string(),
            phone: None,
        })
        .unwrap_err();
        assert!(errors.contains("name"));

        let errors = validate_login(ReqLogin {
            email: "  ".to_string(),
            password: "secret".to_string(),
        })
        .unwrap_err();
        assert!(errors.contains("email"));

        let errors = validate_refresh(ReqRefreshToken {
            refresh_token: " ".to_string(),
        })
        .unwrap_err();
        assert!(errors.contains("refresh_token"));
    }
}
