//! Uniform response envelope and the object streaming path.
//!
//! Every JSON body has the shape `{code, title, data, errors}` with absent
//! fields omitted. Platform identification headers are added to every
//! response by [`platform_headers`].

use axum::{
    Json,
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::{
    error::{AppError, ErrorCode},
    services::{
        image::{self, ResizeError, ResizeRequest},
        storage::StoredObject,
    },
};

pub const PLATFORM: &str = "Shopicano";
pub const PLATFORM_DEVELOPER: &str = "Coders Garage";
pub const PLATFORM_CONNECT: &str = "www.shopicano.com";

/// JSON envelope shared by success and error responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

/// Successful response: status plus enveloped data.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    title: Option<String>,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            title: None,
            data: Some(data),
        }
    }

    /// 201 Created with a title and the created record.
    pub fn created(title: &str, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            title: Some(title.to_string()),
            data: Some(data),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

impl ApiResponse<()> {
    /// 200 OK carrying only a title.
    pub fn message(title: &str) -> Self {
        Self {
            status: StatusCode::OK,
            title: Some(title.to_string()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            code: None,
            title: self.title,
            data: self.data,
            errors: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Layers adding the fixed platform headers to every response.
pub fn platform_headers() -> [SetResponseHeaderLayer<HeaderValue>; 3] {
    [
        SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-platform"),
            HeaderValue::from_static(PLATFORM),
        ),
        SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-platform-developer"),
            HeaderValue::from_static(PLATFORM_DEVELOPER),
        ),
        SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-platform-connect"),
            HeaderValue::from_static(PLATFORM_CONNECT),
        ),
    ]
}

/// Serve an object from storage, resizing it when requested.
///
/// Without a positive width or height the stored bytes are returned
/// untouched with their stored content type. Otherwise the image is decoded,
/// resized with a Lanczos filter and re-encoded as JPEG.
pub fn serve_object(object: StoredObject, resize: ResizeRequest) -> Result<Response, AppError> {
    let extension = object
        .key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_else(|| "bin".to_string());

    let (content_type, extension, bytes) = if resize.is_passthrough() {
        (object.content_type, extension, object.bytes)
    } else {
        let encoded = image::resize_to_jpeg(&object.bytes, &resize).map_err(|e| match e {
            ResizeError::TooLarge => AppError::invalid_field(ErrorCode::FileDataInvalid, "file", &e.to_string()),
            ResizeError::Decode(_) => {
                AppError::invalid_field(ErrorCode::ImageDecodeFailed, "file", "not a decodable image")
            }
        })?;
        ("image/jpeg".to_string(), "jpg".to_string(), encoded)
    };

    let disposition = format!("inline; filename=\"{}.{}\"", object.etag, extension);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}
