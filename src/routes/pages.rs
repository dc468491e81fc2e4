/**
 * Page Routes
 * Editor-shaped page listing/saving, raw admin page access, rendered pages
 */
use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use regex::Regex;
use serde_json::{json, Value};

use crate::content::page::default_page;
use crate::content::render::render_page_html;
use crate::content::transform::{denormalize_page, normalize_page};
use crate::content::{EditorPage, Page};
use crate::routes::{store_unavailable, ErrorResponse};
use crate::store::{self, StoreError};

lazy_static::lazy_static! {
    /// Valid page id: lowercase letters, numbers, and hyphens. Page ids end
    /// up in file paths, so nothing else gets through.
    static ref PAGE_ID_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

fn is_valid_page_id(page_id: &str) -> bool {
    PAGE_ID_REGEX.is_match(page_id)
}

fn invalid_page_id() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid page id".to_string(),
            message: Some(
                "Page ids may contain only lowercase letters, numbers, and hyphens".to_string(),
            ),
        }),
    )
}

/// GET /api/pages - every stored page, normalized to editor shape
pub async fn list_pages() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    let keys = match store.list("pages") {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!("Failed to list pages: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to read pages")),
            )
                .into_response();
        }
    };

    let mut pages: Vec<EditorPage> = Vec::with_capacity(keys.len());
    for key in keys {
        match store.read_as::<Page>(&format!("pages/{key}")) {
            Ok(page) => pages.push(normalize_page(&page)),
            Err(e) => {
                tracing::error!(page = %key, "Failed to read page: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to read pages")),
                )
                    .into_response();
            }
        }
    }

    (StatusCode::OK, Json(pages)).into_response()
}

/// POST /api/pages - denormalize an edited page and overwrite its document
pub async fn save_page(Json(editor): Json<EditorPage>) -> impl IntoResponse {
    if !is_valid_page_id(&editor.id) {
        return invalid_page_id().into_response();
    }

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    let page = denormalize_page(&editor);
    let document = match serde_json::to_value(&page) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(page = %editor.id, "Failed to serialize page: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save page")),
            )
                .into_response();
        }
    };

    if let Err(e) = store.write(&format!("pages/{}", editor.id), &document) {
        tracing::error!(page = %editor.id, "Failed to write page: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to save page")),
        )
            .into_response();
    }

    tracing::info!(page = %editor.id, blocks = editor.blocks.len(), "page saved");
    (StatusCode::OK, Json(json!({ "success": true, "page": editor }))).into_response()
}

/// GET /api/admin/pages/{page_id} - raw stored document, defaulted when absent
pub async fn get_stored_page(Path(page_id): Path<String>) -> impl IntoResponse {
    if !is_valid_page_id(&page_id) {
        return invalid_page_id().into_response();
    }

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read(&format!("pages/{page_id}")) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(StoreError::NotFound(_)) => {
            let page = default_page(&page_id);
            (StatusCode::OK, Json(serde_json::to_value(page).unwrap_or(Value::Null)))
                .into_response()
        }
        Err(e) => {
            tracing::error!(page = %page_id, "Failed to read page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to load page")),
            )
                .into_response()
        }
    }
}

/// POST /api/admin/pages/{page_id} - whole-file replace with the posted body
pub async fn save_stored_page(
    Path(page_id): Path<String>,
    Json(document): Json<Value>,
) -> impl IntoResponse {
    if !is_valid_page_id(&page_id) {
        return invalid_page_id().into_response();
    }

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.write(&format!("pages/{page_id}"), &document) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Page saved successfully" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(page = %page_id, "Failed to write page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save page")),
            )
                .into_response()
        }
    }
}

/// GET /pages/{page_id} - the stored page rendered as HTML
pub async fn view_page(Path(page_id): Path<String>) -> impl IntoResponse {
    if !is_valid_page_id(&page_id) {
        return invalid_page_id().into_response();
    }

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    let page = match store.read_as::<Page>(&format!("pages/{page_id}")) {
        Ok(page) => page,
        Err(StoreError::NotFound(_)) => default_page(&page_id),
        Err(e) => {
            tracing::error!(page = %page_id, "Failed to read page: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to load page")),
            )
                .into_response();
        }
    };

    Html(render_page_html(&page)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_id_validation() {
        assert!(is_valid_page_id("homepage"));
        assert!(is_valid_page_id("about-us"));
        assert!(is_valid_page_id("dutch-cash-rebate"));
        assert!(!is_valid_page_id("About"));
        assert!(!is_valid_page_id("../etc"));
        assert!(!is_valid_page_id(""));
        assert!(!is_valid_page_id("-leading"));
    }
}
