//! Repository errors and their mapping onto HTTP errors.

use crate::{
    error::{AppError, ErrorCode, FieldErrors},
    models::order::PricingError,
};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a repository operation.
///
/// Constraint violations are classified here so handlers never inspect
/// database error codes themselves.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No record, or a record owned by another store.
    #[error("record not found")]
    NotFound,

    /// Unique constraint violated.
    #[error("duplicate key violates {constraint}")]
    Duplicate { constraint: String },

    /// Foreign key constraint violated.
    #[error("invalid reference violates {constraint}")]
    InvalidReference { constraint: String },

    /// The write was refused for a business reason.
    #[error("{field}: {message}")]
    Rejected { field: String, message: String },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl RepoError {
    pub fn rejected(field: &str, message: impl Into<String>) -> Self {
        RepoError::Rejected {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Map onto the HTTP error of `entity`.
    pub fn into_app(self, entity: Entity) -> AppError {
        match self {
            RepoError::NotFound => AppError::NotFound(entity.not_found()),
            RepoError::Duplicate { .. } => AppError::Conflict(entity.already_exists()),
            RepoError::InvalidReference { constraint } => {
                let mut errors = FieldErrors::new();
                errors.add(reference_field(&constraint), "referenced record does not exist");
                AppError::Validation {
                    code: entity.data_invalid(),
                    errors,
                }
            }
            RepoError::Rejected { field, message } => {
                let mut errors = FieldErrors::new();
                errors.add(field, message);
                AppError::Validation {
                    code: entity.data_invalid(),
                    errors,
                }
            }
            RepoError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = error {
            return RepoError::NotFound;
        }

        if let sqlx::Error::Database(ref db_err) = error {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return RepoError::Duplicate { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::InvalidReference { constraint };
            }
        }

        RepoError::Database(error)
    }
}

impl From<PricingError> for RepoError {
    fn from(error: PricingError) -> Self {
        RepoError::rejected(error.field(), error.to_string())
    }
}

/// `products_category_id_fkey` → `category_id`
fn reference_field(constraint: &str) -> String {
    let column = constraint.strip_suffix("_fkey").unwrap_or(constraint);
    ["_category_id", "_store_id", "_user_id", "_product_id", "_coupon_id", "_permission_id"]
        .iter()
        .find(|suffix| column.ends_with(*suffix))
        .map(|suffix| suffix.trim_start_matches('_').to_string())
        .unwrap_or_else(|| column.to_string())
}

/// Entity an operation is about; selects the error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Store,
    Staff,
    Product,
    ProductAttribute,
    Category,
    Coupon,
    Order,
    Settings,
}

impl Entity {
    pub fn not_found(self) -> ErrorCode {
        match self {
            Entity::User => ErrorCode::UserNotFound,
            Entity::Store => ErrorCode::StoreNotFound,
            Entity::Staff => ErrorCode::StaffNotFound,
            Entity::Product => ErrorCode::ProductNotFound,
            Entity::ProductAttribute => ErrorCode::ProductAttributeNotFound,
            Entity::Category => ErrorCode::CategoryNotFound,
            Entity::Coupon => ErrorCode::CouponNotFound,
            Entity::Order => ErrorCode::OrderNotFound,
            Entity::Settings => ErrorCode::SettingsNotFound,
        }
    }

    pub fn already_exists(self) -> ErrorCode {
        match self {
            Entity::User => ErrorCode::UserAlreadyExists,
            Entity::Store => ErrorCode::StoreAlreadyExists,
            Entity::Staff => ErrorCode::UserAlreadyStaff,
            Entity::Product => ErrorCode::ProductAlreadyExists,
            Entity::ProductAttribute => ErrorCode::ProductAttributeAlreadyExists,
            Entity::Category => ErrorCode::CategoryAlreadyExists,
            Entity::Coupon => ErrorCode::CouponAlreadyExists,
            Entity::Order => ErrorCode::OrderAlreadyExists,
            Entity::Settings => ErrorCode::SettingsDataInvalid,
        }
    }

    pub fn data_invalid(self) -> ErrorCode {
        match self {
            Entity::User => ErrorCode::UserUpdateDataInvalid,
            Entity::Store => ErrorCode::StoreDataInvalid,
            Entity::Staff => ErrorCode::StaffDataInvalid,
            Entity::Product => ErrorCode::ProductDataInvalid,
            Entity::ProductAttribute => ErrorCode::ProductAttributeDataInvalid,
            Entity::Category => ErrorCode::CategoryDataInvalid,
            Entity::Coupon => ErrorCode::CouponDataInvalid,
            Entity::Order => ErrorCode::OrderDataInvalid,
            Entity::Settings => ErrorCode::SettingsDataInvalid,
        }
    }
}
