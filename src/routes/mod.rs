/**
 * Routes Module
 * API route handlers
 */
pub mod backup;
pub mod catalog;
pub mod database;
pub mod health;
pub mod logs;
pub mod pages;
pub mod roles;
pub mod site;
pub mod upload;

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Error response shared by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

pub(crate) fn store_unavailable() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::new("Document store not available")),
    )
}
