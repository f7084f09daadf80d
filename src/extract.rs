//! Request extractors whose rejections use the application envelope.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;

use crate::{error::AppError, models::Page, services::image::ResizeRequest};

/// `axum::Json` rejecting with [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` rejecting with [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `page`, `limit` and `query` parameters of list endpoints.
///
/// Kept as raw strings so malformed numbers fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::from_query(self.page.as_deref(), self.limit.as_deref())
    }

    /// Search term, blank counts as absent.
    pub fn search(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// `width`, `height` and `quality` of the object serving path.
#[derive(Debug, Default, Deserialize)]
pub struct ResizeQuery {
    pub width: Option<String>,
    pub height: Option<String>,
    pub quality: Option<String>,
}

impl ResizeQuery {
    pub fn request(&self) -> ResizeRequest {
        ResizeRequest::parse(
            self.width.as_deref(),
            self.height.as_deref(),
            self.quality.as_deref(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub timeline: Option<String>,
}
