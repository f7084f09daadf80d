use serde::Deserialize;
use validator::Validate;

use super::{non_blank, structural_errors, trim};
use crate::{error::FieldErrors, models::category::CategoryInput};

/// Body of `POST /v1/categories` and `PATCH /v1/categories/{id}`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReqCategory {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub fn validate(mut req: ReqCategory) -> Result<CategoryInput, FieldErrors> {
    trim(&mut req.name);
    let errors = structural_errors(&req);

    errors.into_result(CategoryInput {
        name: req.name,
        description: non_blank(req.description),
        image: non_blank(req.image),
    })
}
