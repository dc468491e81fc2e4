/**
 * Backup Routes
 * Snapshot all database files into one timestamped JSON document
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::PathBuf;

use crate::content::page::iso_now;
use crate::routes::database::DbKind;
use crate::routes::{store_unavailable, ErrorResponse};
use crate::store::{self, StoreError};

fn backup_dir() -> PathBuf {
    PathBuf::from(std::env::var("BACKUP_DIR").unwrap_or_else(|_| "backups".to_string()))
}

#[derive(Debug, Serialize)]
pub struct BackupInfo {
    pub name: String,
    pub date: String,
    pub size: u64,
}

/// POST /api/admin/database/backup
pub async fn create_backup() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    let mut data = Map::new();
    // Record databases plus the central roles file; missing files are
    // skipped, unreadable ones fail the whole backup.
    let mut keys: Vec<&str> = DbKind::all().iter().map(|kind| kind.file_key()).collect();
    keys.push("roles");
    for key in keys {
        match store.read(key) {
            Ok(document) => {
                data.insert(key.to_string(), document);
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                tracing::error!(database = key, "Backup read failed: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to create backup")),
                )
                    .into_response();
            }
        }
    }

    let timestamp = iso_now().replace([':', '.'], "-");
    let backup_name = format!("backup-{timestamp}");
    let dir = backup_dir();
    let path = dir.join(format!("{backup_name}.json"));

    let result = fs::create_dir_all(&dir).and_then(|_| {
        let content = serde_json::to_string_pretty(&Value::Object(data))?;
        fs::write(&path, content)
    });

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Backup created successfully",
                "backupName": backup_name,
                "path": path.to_string_lossy(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Backup write failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to create backup")),
            )
                .into_response()
        }
    }
}

/// GET /api/admin/database/backup - list backups, newest first
pub async fn list_backups() -> impl IntoResponse {
    let dir = backup_dir();
    if !dir.exists() {
        return (StatusCode::OK, Json(Vec::<BackupInfo>::new())).into_response();
    }

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read backup directory: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to list backups")),
            )
                .into_response();
        }
    };

    let mut backups = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(metadata) = entry.metadata() else { continue };
        let date = metadata
            .modified()
            .map(|t| {
                let dt: DateTime<Utc> = t.into();
                dt.to_rfc3339()
            })
            .unwrap_or_default();

        backups.push(BackupInfo {
            name: name.to_string(),
            date,
            size: metadata.len(),
        });
    }

    backups.sort_by(|a, b| b.date.cmp(&a.date));

    (StatusCode::OK, Json(backups)).into_response()
}
