/**
 * Upload Route
 * Multipart image upload for the admin UI
 */
use axum::{extract::Multipart, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::routes::ErrorResponse;

const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub fn public_dir() -> PathBuf {
    PathBuf::from(std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub success: bool,
    pub file_name: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Sniff the real content type; the declared MIME alone is not trusted.
fn validate_image_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Upload folders are a single path segment; anything else could climb out
/// of the images directory.
fn is_safe_folder(folder: &str) -> bool {
    !folder.is_empty()
        && folder
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn bad_request(error: &str) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error))).into_response()
}

/// POST /api/admin/upload - store an image, return its public path
pub async fn upload_image(mut multipart: Multipart) -> impl IntoResponse {
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut folder = "uploads".to_string();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Multipart error: {}", e);
                return bad_request("Invalid multipart data");
            }
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let declared_type = field.content_type().map(str::to_string);
                let bytes = match field.bytes().await {
                    Ok(b) => b.to_vec(),
                    Err(e) => {
                        tracing::error!("Failed to read upload bytes: {}", e);
                        return bad_request("Failed to read file data");
                    }
                };
                file = Some((bytes, declared_type));
            }
            Some("folder") => {
                if let Ok(value) = field.text().await {
                    if !value.is_empty() {
                        folder = value;
                    }
                }
            }
            _ => {}
        }
    }

    let Some((bytes, declared_type)) = file else {
        return bad_request("No file received");
    };

    let declared_type = declared_type.unwrap_or_default();
    if !ALLOWED_TYPES.contains(&declared_type.as_str()) {
        return bad_request("Invalid file type");
    }

    if bytes.len() > MAX_FILE_SIZE {
        return bad_request("File too large");
    }

    let Some(mime_type) = validate_image_magic_bytes(&bytes) else {
        return bad_request("File content does not match an allowed image type");
    };

    if !is_safe_folder(&folder) {
        return bad_request("Invalid folder");
    }

    let upload_dir = public_dir().join("images").join(&folder);
    if let Err(e) = tokio::fs::create_dir_all(&upload_dir).await {
        tracing::error!("Failed to create upload directory: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Upload failed")),
        )
            .into_response();
    }

    let file_name = format!("{}.{}", Uuid::new_v4(), extension_for_mime(mime_type));
    let file_path = upload_dir.join(&file_name);

    if let Err(e) = tokio::fs::write(&file_path, &bytes).await {
        tracing::error!("Failed to write upload file: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Upload failed")),
        )
            .into_response();
    }

    let url = format!("/images/{}/{}", folder, file_name);
    tracing::info!(%url, size = bytes.len(), "image uploaded");

    (
        StatusCode::OK,
        Json(UploadResponse {
            url,
            success: true,
            file_name,
            size: bytes.len(),
            mime_type: mime_type.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_identify_allowed_types() {
        assert_eq!(
            validate_image_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(
            validate_image_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some("image/png")
        );
        assert_eq!(
            validate_image_magic_bytes(&[0x47, 0x49, 0x46, 0x38, 0x39]),
            Some("image/gif")
        );
        assert_eq!(
            validate_image_magic_bytes(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            Some("image/webp")
        );
        assert_eq!(validate_image_magic_bytes(b"GIF"), None);
        assert_eq!(validate_image_magic_bytes(b"%PDF-1.4"), None);
    }

    #[test]
    fn extension_follows_sniffed_mime() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("application/pdf"), "bin");
    }

    #[test]
    fn folder_names_are_single_safe_segments() {
        assert!(is_safe_folder("uploads"));
        assert!(is_safe_folder("team-photos"));
        assert!(!is_safe_folder("a/b"));
        assert!(!is_safe_folder(".."));
        assert!(!is_safe_folder(""));
        assert!(!is_safe_folder("Has Space"));
    }
}
