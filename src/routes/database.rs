/**
 * Database Routes
 * Generic CRUD over the flat-file record databases
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::routes::{store_unavailable, ErrorResponse};
use crate::store::{self, StoreError};

/// The record databases the admin UI can edit. Each is one JSON file holding
/// a single named array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Projects,
    People,
    Freelancers,
    Facilities,
    News,
    CreditRoles,
}

impl DbKind {
    pub fn all() -> [DbKind; 6] {
        [
            DbKind::Projects,
            DbKind::People,
            DbKind::Freelancers,
            DbKind::Facilities,
            DbKind::News,
            DbKind::CreditRoles,
        ]
    }

    pub fn from_param(param: &str) -> Option<DbKind> {
        match param {
            "projects" => Some(DbKind::Projects),
            "people" => Some(DbKind::People),
            "freelancers" => Some(DbKind::Freelancers),
            "facilities" => Some(DbKind::Facilities),
            "news" => Some(DbKind::News),
            "credit-roles" => Some(DbKind::CreditRoles),
            _ => None,
        }
    }

    /// Store key (and so file name) of the database document.
    pub fn file_key(self) -> &'static str {
        match self {
            DbKind::Projects => "projects",
            DbKind::People => "people",
            DbKind::Freelancers => "freelancers",
            DbKind::Facilities => "facilities",
            DbKind::News => "news",
            DbKind::CreditRoles => "credit-roles",
        }
    }

    /// Name of the record array inside the document.
    pub fn array_key(self) -> &'static str {
        match self {
            DbKind::Projects => "projects",
            DbKind::People => "people",
            DbKind::Freelancers => "freelancers",
            DbKind::Facilities => "facilities",
            DbKind::News => "news",
            DbKind::CreditRoles => "creditRoles",
        }
    }
}

/// Record mutation, discriminated by the `action` field of the request body.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RecordAction {
    Add {
        #[serde(default)]
        item: Value,
    },
    Update {
        #[serde(default)]
        id: String,
        #[serde(default)]
        item: Value,
    },
    BulkUpdate {
        #[serde(default)]
        updates: Vec<Value>,
    },
    Delete {
        #[serde(default)]
        id: String,
    },
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// News posts carry editor-supplied HTML in `content`; it is sanitized
/// before it can reach storage.
fn sanitize_item(kind: DbKind, item: &mut Map<String, Value>) {
    if kind != DbKind::News {
        return;
    }
    if let Some(Value::String(content)) = item.get("content") {
        let clean = ammonia::clean(content);
        item.insert("content".to_string(), Value::String(clean));
    }
}

/// Apply one mutation to a record array. Pure - no file I/O, so the action
/// semantics are testable on their own.
pub fn apply_action(mut records: Vec<Value>, action: &RecordAction, kind: DbKind) -> Vec<Value> {
    match action {
        RecordAction::Add { item } => {
            let mut item = item.as_object().cloned().unwrap_or_default();
            let has_id = matches!(item.get("id"), Some(Value::String(id)) if !id.is_empty());
            if !has_id {
                item.insert(
                    "id".to_string(),
                    Value::String(Utc::now().timestamp_millis().to_string()),
                );
            }
            sanitize_item(kind, &mut item);
            records.push(Value::Object(item));
        }
        RecordAction::Update { id, item } => {
            let mut patch = item.as_object().cloned().unwrap_or_default();
            sanitize_item(kind, &mut patch);
            // A non-matching id is a silent no-op, like the admin UI expects.
            if let Some(record) = records
                .iter_mut()
                .find(|record| record_id(record) == Some(id.as_str()))
            {
                if let Some(existing) = record.as_object_mut() {
                    for (key, value) in patch {
                        existing.insert(key, value);
                    }
                }
            }
        }
        RecordAction::BulkUpdate { updates } => {
            for update in updates {
                let Some(update) = update.as_object() else { continue };
                let Some(id) = update.get("id").and_then(Value::as_str) else { continue };
                // Each entry patches exactly one non-id field.
                let Some(field) = update.keys().find(|key| key.as_str() != "id") else {
                    continue;
                };
                if let Some(record) = records
                    .iter_mut()
                    .find(|record| record_id(record) == Some(id))
                {
                    if let Some(existing) = record.as_object_mut() {
                        existing.insert(field.clone(), update[field].clone());
                    }
                }
            }
        }
        RecordAction::Delete { id } => {
            records.retain(|record| record_id(record) != Some(id.as_str()));
        }
    }
    records
}

fn default_database_doc() -> Value {
    json!({
        "facilities": [],
        "projects": [],
        "people": [],
        "freelancers": [],
        "news": [],
        "creditRoles": []
    })
}

fn database_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Database not found")),
    )
}

fn read_database_doc(
    store: &store::FileStore,
    kind: DbKind,
) -> Result<Value, (StatusCode, Json<ErrorResponse>)> {
    match store.read(kind.file_key()) {
        Ok(doc) => Ok(doc),
        Err(StoreError::NotFound(_)) => Ok(default_database_doc()),
        Err(e) => {
            tracing::error!(database = kind.file_key(), "Failed to read database: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to read database")),
            ))
        }
    }
}

fn records_of(doc: &Value, kind: DbKind) -> Vec<Value> {
    doc.get(kind.array_key())
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn write_records(
    store: &store::FileStore,
    kind: DbKind,
    mut doc: Value,
    records: Vec<Value>,
) -> Result<Vec<Value>, (StatusCode, Json<ErrorResponse>)> {
    if !doc.is_object() {
        doc = default_database_doc();
    }
    if let Some(map) = doc.as_object_mut() {
        map.insert(kind.array_key().to_string(), Value::Array(records.clone()));
    }

    match store.write(kind.file_key(), &doc) {
        Ok(()) => Ok(records),
        Err(e) => {
            tracing::error!(database = kind.file_key(), "Failed to write database: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update database")),
            ))
        }
    }
}

/// GET /api/admin/database/{db_type} - the record array (empty when the file
/// is missing)
pub async fn get_database(Path(db_type): Path<String>) -> impl IntoResponse {
    let Some(kind) = DbKind::from_param(&db_type) else {
        return database_not_found().into_response();
    };

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read(kind.file_key()) {
        Ok(doc) => (StatusCode::OK, Json(Value::Array(records_of(&doc, kind)))).into_response(),
        Err(StoreError::NotFound(_)) => (StatusCode::OK, Json(json!([]))).into_response(),
        Err(e) => {
            tracing::error!(database = kind.file_key(), "Failed to read database: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to read database")),
            )
                .into_response()
        }
    }
}

/// POST /api/admin/database/{db_type} - apply one record mutation
pub async fn post_database(
    Path(db_type): Path<String>,
    Json(action): Json<RecordAction>,
) -> impl IntoResponse {
    let Some(kind) = DbKind::from_param(&db_type) else {
        return database_not_found().into_response();
    };

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    let doc = match read_database_doc(&store, kind) {
        Ok(doc) => doc,
        Err(err) => return err.into_response(),
    };

    let records = apply_action(records_of(&doc, kind), &action, kind);

    match write_records(&store, kind, doc, records) {
        Ok(records) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": records }))).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
    pub ids: Option<String>,
}

/// DELETE /api/admin/database/{db_type}?id=... or ?ids=a,b,c
pub async fn delete_from_database(
    Path(db_type): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> impl IntoResponse {
    let Some(kind) = DbKind::from_param(&db_type) else {
        return database_not_found().into_response();
    };

    let ids: Vec<String> = query
        .ids
        .as_deref()
        .map(|ids| ids.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    if query.id.is_none() && ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("ID or IDs parameter required")),
        )
            .into_response();
    }

    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    let doc = match read_database_doc(&store, kind) {
        Ok(doc) => doc,
        Err(err) => return err.into_response(),
    };

    let mut records = records_of(&doc, kind);
    let message = if let Some(id) = &query.id {
        records.retain(|record| record_id(record) != Some(id.as_str()));
        "Item deleted successfully".to_string()
    } else {
        records.retain(|record| {
            record_id(record).map_or(true, |id| !ids.iter().any(|target| target == id))
        });
        format!("{} items deleted successfully", ids.len())
    };

    match write_records(&store, kind, doc, records) {
        Ok(records) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": message, "data": records })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
