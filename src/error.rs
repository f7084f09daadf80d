//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and enveloped JSON bodies.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::response::Envelope;

/// Machine-readable error codes returned in the `code` field of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RequestBodyInvalid,
    ResourceNotFound,

    UserSignUpDataInvalid,
    UserLoginDataInvalid,
    UserUpdateDataInvalid,
    UserNotFound,
    UserAlreadyExists,
    InvalidCredentials,
    InvalidAuthorizationToken,
    InvalidRefreshToken,
    SignUpDisabled,
    AdminOnly,

    StoreDataInvalid,
    StoreNotFound,
    StoreAlreadyExists,
    StoreNotActive,
    StoreCreationDisabled,
    UserNotStoreStaff,
    UserAlreadyStaff,
    StaffDataInvalid,
    StaffNotFound,
    StaffPermissionDenied,

    ProductDataInvalid,
    ProductNotFound,
    ProductAlreadyExists,
    ProductAttributeDataInvalid,
    ProductAttributeNotFound,
    ProductAttributeAlreadyExists,

    CategoryDataInvalid,
    CategoryNotFound,
    CategoryAlreadyExists,

    CouponDataInvalid,
    CouponNotFound,
    CouponAlreadyExists,

    OrderDataInvalid,
    OrderNotFound,
    OrderAlreadyExists,

    SettingsDataInvalid,
    SettingsNotFound,

    StatsQueryInvalid,

    FileDataInvalid,
    FileNotFound,
    ImageDecodeFailed,

    DatabaseQueryFailed,
    StorageFailed,
}

impl ErrorCode {
    /// Human-readable title placed next to the code in the envelope.
    pub fn title(self) -> &'static str {
        match self {
            ErrorCode::RequestBodyInvalid => "Invalid request body",
            ErrorCode::ResourceNotFound => "Resource not found",
            ErrorCode::UserSignUpDataInvalid
            | ErrorCode::UserLoginDataInvalid
            | ErrorCode::UserUpdateDataInvalid
            | ErrorCode::StoreDataInvalid
            | ErrorCode::StaffDataInvalid
            | ErrorCode::ProductDataInvalid
            | ErrorCode::ProductAttributeDataInvalid
            | ErrorCode::CategoryDataInvalid
            | ErrorCode::CouponDataInvalid
            | ErrorCode::OrderDataInvalid
            | ErrorCode::SettingsDataInvalid
            | ErrorCode::StatsQueryInvalid
            | ErrorCode::FileDataInvalid => "Invalid data",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserAlreadyExists => "User already exists",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::InvalidAuthorizationToken => "Invalid authorization token",
            ErrorCode::InvalidRefreshToken => "Invalid refresh token",
            ErrorCode::SignUpDisabled => "Sign up is disabled",
            ErrorCode::AdminOnly => "Only platform admins are allowed",
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreAlreadyExists => "Store already exists",
            ErrorCode::StoreNotActive => "Store is not active",
            ErrorCode::StoreCreationDisabled => "Store creation is disabled",
            ErrorCode::UserNotStoreStaff => "User is not a store staff",
            ErrorCode::UserAlreadyStaff => "User is already a store staff",
            ErrorCode::StaffNotFound => "Staff not found",
            ErrorCode::StaffPermissionDenied => "Staff permission denied",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductAlreadyExists => "Product already exists",
            ErrorCode::ProductAttributeNotFound => "Product attribute not found",
            ErrorCode::ProductAttributeAlreadyExists => "Product attribute already exists",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryAlreadyExists => "Category already exists",
            ErrorCode::CouponNotFound => "Coupon not found",
            ErrorCode::CouponAlreadyExists => "Coupon already exists",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyExists => "Order already exists",
            ErrorCode::SettingsNotFound => "Settings not found",
            ErrorCode::FileNotFound => "File not found",
            ErrorCode::ImageDecodeFailed => "Image could not be decoded",
            ErrorCode::DatabaseQueryFailed => "Database query failed",
            ErrorCode::StorageFailed => "Storage operation failed",
        }
    }
}

/// Validation errors collected per field.
///
/// Every rule runs; a field may carry several messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `value` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Application-wide error type.
///
/// Each variant maps to exactly one HTTP status code; the carried
/// [`ErrorCode`] is what distinguishes entities.
///
/// # Status Code Mapping
///
/// - `Validation` → 422 Unprocessable Entity (field map in `errors`)
/// - `NotFound` → 404 Not Found
/// - `Conflict` → 409 Conflict
/// - `Unauthorized` → 401 Unauthorized
/// - `Forbidden` → 403 Forbidden
/// - `Database`, `Storage`, `Internal` → 500 Internal Server Error (details hidden)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid data")]
    Validation { code: ErrorCode, errors: FieldErrors },

    #[error("{}", .0.title())]
    NotFound(ErrorCode),

    #[error("{}", .0.title())]
    Conflict(ErrorCode),

    #[error("{}", .0.title())]
    Unauthorized(ErrorCode),

    #[error("{}", .0.title())]
    Forbidden(ErrorCode),

    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Object storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure for a single field.
    pub fn invalid_field(code: ErrorCode, field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        AppError::Validation { code, errors }
    }

    /// Wrap collected field errors, for `map_err`.
    pub fn validation(code: ErrorCode) -> impl FnOnce(FieldErrors) -> AppError {
        move |errors| AppError::Validation { code, errors }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::NotFound(code)
            | AppError::Conflict(code)
            | AppError::Unauthorized(code)
            | AppError::Forbidden(code) => *code,
            AppError::Database(_) | AppError::Internal(_) => ErrorCode::DatabaseQueryFailed,
            AppError::Storage(_) => ErrorCode::StorageFailed,
        }
    }
}

/// Convert AppError into an enveloped HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "code": "product_data_invalid",
///   "title": "Invalid data",
///   "errors": { "name": ["name is required"] }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Internal failures are logged here and never leak to the client
        if status.is_server_error() {
            tracing::error!(error = %self, code = ?code, "request failed");
        }

        let errors = match self {
            AppError::Validation { errors, .. } => serde_json::to_value(errors).ok(),
            _ => None,
        };

        let body = Envelope::<()> {
            code: Some(code),
            title: Some(code.title().to_string()),
            data: None,
            errors,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Malformed or mistyped JSON bodies are reported like validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_field(ErrorCode::RequestBodyInvalid, "body", &rejection.body_text())
    }
}

/// Unparseable path identifiers cannot name an existing record.
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound(ErrorCode::ResourceNotFound)
    }
}
