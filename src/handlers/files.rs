//! Object upload and the image response path.

use axum::{
    Extension,
    extract::{Multipart, Query, State, multipart::MultipartRejection},
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode},
    extract::{AppPath, ResizeQuery},
    middleware::auth::AuthContext,
    response::{self, ApiResponse},
    services::storage::content_type_for,
    state::AppState,
};

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// Lowercase extension of an uploaded file name, `bin` when missing or odd.
fn extension_of(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

fn invalid_upload(message: &str) -> AppError {
    AppError::invalid_field(ErrorCode::FileDataInvalid, UPLOAD_FIELD, message)
}

/// Store the multipart field `file` under a fresh `<uuid>.<ext>` key.
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<UploadedFile>, AppError> {
    let mut multipart = multipart.map_err(|e| invalid_upload(&e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_upload(&e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let key = format!("{}.{}", Uuid::new_v4(), extension_of(field.file_name()));
        let bytes = field.bytes().await.map_err(|e| invalid_upload(&e.body_text()))?;
        if bytes.is_empty() {
            return Err(invalid_upload("file is empty"));
        }

        let size = bytes.len();
        state.objects.put(&key, bytes.to_vec()).await?;

        tracing::info!(key = %key, size, user_id = %auth.user_id, "file uploaded");

        return Ok(ApiResponse::created(
            "File uploaded",
            UploadedFile {
                content_type: content_type_for(&key).to_string(),
                key,
                size,
            },
        ));
    }

    Err(invalid_upload("file is required"))
}

/// Serve an object, optionally resized.
///
/// # Query Parameters
///
/// - `width`, `height`: target size; non-positive or non-numeric count as 0
/// - `quality`: JPEG quality 1 to 100, default 100
///
/// Without a positive dimension the stored bytes are streamed unchanged.
pub async fn serve_file(
    State(state): State<AppState>,
    AppPath(key): AppPath<String>,
    Query(query): Query<ResizeQuery>,
) -> Result<Response, AppError> {
    let object = state
        .objects
        .get(&key)
        .await?
        .ok_or(AppError::NotFound(ErrorCode::FileNotFound))?;

    response::serve_object(object, query.request())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("photo.PNG"), "png")]
    #[case(Some("archive.tar.gz"), "gz")]
    #[case(Some("noext"), "bin")]
    #[case(Some("weird.p/g"), "bin")]
    #[case(None, "bin")]
    fn upload_extension(#[case] name: Option<&str>, #[case] expected: &str) {
        assert_eq!(extension_of(name), expected);
    }
}
