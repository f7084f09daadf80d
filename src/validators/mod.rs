//! Request validation.
//!
//! Each submodule exposes `Req*` structs (the raw JSON bodies) and pure
//! functions that turn them into typed inputs or a [`FieldErrors`] map.
//! Structural rules come from the `validator` derive; cross-field rules are
//! written by hand. Every rule runs, errors are collected rather than
//! returned on the first failure. Nothing here touches the database.

pub mod category;
pub mod coupon;
pub mod order;
pub mod product;
pub mod settings;
pub mod store;
pub mod user;

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::FieldErrors;

/// Run the derived rules of `value` and flatten them into field errors.
///
/// Nested structs are reported as `parent.field`, list items as
/// `parent[index].field`.
pub fn structural_errors(value: &impl Validate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Err(e) = value.validate() {
        flatten("", &e, &mut errors);
    }
    errors
}

fn flatten(prefix: &str, source: &ValidationErrors, into: &mut FieldErrors) {
    for (field, kind) in source.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    into.add(path.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, into),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&format!("{path}[{index}]"), inner, into);
                }
            }
        }
    }
}

/// Trim and drop blank entries.
pub(crate) fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Trim in place. Runs before the derived rules, so a length rule sees the
/// value that gets stored and whitespace never passes for content.
pub(crate) fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub(crate) fn trim_present(value: &mut Option<String>) {
    if let Some(value) = value {
        trim(value);
    }
}

/// Blank strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
