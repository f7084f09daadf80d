use serde::Deserialize;
use validator::Validate;

use super::{non_blank, structural_errors, trim};
use crate::{
    error::FieldErrors,
    models::store::{NewStaff, StaffPermission, StoreInput},
};

/// Body of `POST /v1/stores`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqStoreCreate {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,

    #[validate(length(min = 1, message = "postcode is required"))]
    pub postcode: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,

    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqStaffCreate {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    pub permission: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReqStaffPermission {
    pub permission: String,
}

/// Body of `PATCH /v1/admin/stores/{store_id}`.
#[derive(Debug, Deserialize)]
pub struct ReqStoreActivation {
    pub is_active: bool,
}

pub fn validate_create(mut req: ReqStoreCreate) -> Result<StoreInput, FieldErrors> {
    for field in [
        &mut req.name,
        &mut req.address,
        &mut req.city,
        &mut req.country,
        &mut req.postcode,
        &mut req.email,
        &mut req.phone,
    ] {
        trim(field);
    }
    let errors = structural_errors(&req);

    errors.into_result(StoreInput {
        name: req.name,
        address: req.address,
        city: req.city,
        country: req.country,
        postcode: req.postcode,
        email: req.email.to_lowercase(),
        phone: req.phone,
        description: non_blank(req.description),
    })
}

fn permission(raw: &str, errors: &mut FieldErrors) -> Option<StaffPermission> {
    let parsed = StaffPermission::parse_assignable(raw.trim());
    if parsed.is_none() {
        errors.add("permission", "permission must be manager or staff");
    }
    parsed
}

pub fn validate_staff(mut req: ReqStaffCreate) -> Result<NewStaff, FieldErrors> {
    trim(&mut req.email);
    let mut errors = structural_errors(&req);

    match permission(&req.permission, &mut errors) {
        Some(permission) => errors.into_result(NewStaff {
            email: req.email.to_lowercase(),
            permission,
        }),
        None => Err(errors),
    }
}

pub fn validate_staff_permission(req: ReqStaffPermission) -> Result<StaffPermission, FieldErrors> {
    let mut errors = FieldErrors::new();

    match permission(&req.permission, &mut errors) {
        Some(permission) => Ok(permission),
        None => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_cannot_be_granted() {
        let errors = validate_staff(ReqStaffCreate {
            email: "clerk@example.com".to_string(),
            permission: "owner".to_string(),
        })
        .unwrap_err();

        assert!(errors.contains("permission"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn store_fields_are_required() {
        let errors = validate_create(ReqStoreCreate::default()).unwrap_err();

        for field in ["name", "address", "city", "country", "postcode", "email", "phone"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn whitespace_fields_count_as_missing() {
        let errors = validate_create(ReqStoreCreate {
            name: " ".to_string(),
            address: "  ".to_string(),
            city: "\t".to_string(),
            country: " ".to_string(),
            postcode: " ".to_string(),
            email: " Shop@Initech.test ".to_string(),
            phone: "   ".to_string(),
            description: None,
        })
        .unwrap_err();

        for field in ["name", "address", "city", "country", "postcode", "phone"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("email"));
    }
}
