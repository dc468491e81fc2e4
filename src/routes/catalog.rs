/**
 * Catalog Routes
 * Public typed reads plus the raw whole-document database endpoint
 */
use axum::{extract::Query, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{NewsFile, PeopleFile, ProjectsFile};
use crate::routes::{store_unavailable, ErrorResponse};
use crate::store::{self, StoreError};

/// GET /api/projects
pub async fn get_projects() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read_as::<ProjectsFile>("projects") {
        Ok(file) => (StatusCode::OK, Json(file)).into_response(),
        Err(StoreError::NotFound(_)) => {
            (StatusCode::OK, Json(ProjectsFile::default())).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load projects: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProjectsFile::default())).into_response()
        }
    }
}

/// GET /api/people
pub async fn get_people() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read_as::<PeopleFile>("people") {
        Ok(file) => (StatusCode::OK, Json(file)).into_response(),
        Err(StoreError::NotFound(_)) => {
            (StatusCode::OK, Json(PeopleFile::default())).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load people: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(PeopleFile::default())).into_response()
        }
    }
}

/// GET /api/news
pub async fn get_news() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read_as::<NewsFile>("news") {
        Ok(file) => (StatusCode::OK, Json(file)).into_response(),
        Err(StoreError::NotFound(_)) => (StatusCode::OK, Json(NewsFile::default())).into_response(),
        Err(e) => {
            tracing::error!("Failed to load news: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(NewsFile::default())).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/database?type=... - raw whole-document read
pub async fn get_raw_database(Query(query): Query<TypeQuery>) -> impl IntoResponse {
    let Some(kind) = query.kind else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Type parameter is required")),
        )
            .into_response();
    };

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read(&kind) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(StoreError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Database file not found")),
        )
            .into_response(),
        Err(StoreError::InvalidKey(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid type parameter")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(database = %kind, "Failed to read database: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}

/// POST /api/database?type=... - raw whole-document overwrite
pub async fn save_raw_database(
    Query(query): Query<TypeQuery>,
    Json(document): Json<Value>,
) -> impl IntoResponse {
    let Some(kind) = query.kind else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Type parameter is required")),
        )
            .into_response();
    };

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.write(&kind, &document) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(StoreError::InvalidKey(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid type parameter")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(database = %kind, "Failed to write database: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}
