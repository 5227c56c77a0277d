//! Image Upload Handler
//!
//! Validates uploaded images (size, format, decodability) before handing
//! the bytes to the external asset host, and returns the hosted URL.

use axum::Json;
use axum::extract::{Extension, Multipart, State};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
}

/// Validate an image file before upload
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    // Verify it actually decodes as an image
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({}): {}", ext_lower, e),
        ));
    }

    Ok(())
}

/// POST /api/upload - upload an image to the asset host
pub async fn upload(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let ext = original_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::NoFileProvided));
    }

    validate_image(&data, &ext)?;

    let content_type = mime_guess::from_path(&original_name)
        .first_or_octet_stream()
        .to_string();
    let url = state.assets.upload(&data, &content_type).await?;

    tracing::info!(
        user = %user.id,
        size = data.len(),
        format = %ext,
        "Image uploaded to asset host"
    );

    Ok(Json(UploadResponse {
        url,
        original_name,
        size: data.len(),
        format: ext.to_lowercase(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 PNG
    fn tiny_png() -> Vec<u8> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        let img = image::RgbImage::new(1, 1);
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_validate_image_accepts_png() {
        assert!(validate_image(&tiny_png(), "png").is_ok());
    }

    #[test]
    fn test_validate_image_rejects_bad_extension() {
        let err = validate_image(&tiny_png(), "gif").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
    }

    #[test]
    fn test_validate_image_rejects_garbage_bytes() {
        let err = validate_image(b"not an image", "png").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_validate_image_rejects_oversized() {
        let data = vec![0u8; MAX_FILE_SIZE + 1];
        let err = validate_image(&data, "png").unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }
}
