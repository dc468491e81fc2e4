//! End-to-end tests driving the full router against a temp-dir store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::OnceLock;
use tower::util::ServiceExt;

use postavermaas_backend::{create_app, store};

static TEST_ENV: OnceLock<tempfile::TempDir> = OnceLock::new();

/// One store root for the whole test binary (the store handle is
/// process-wide); tests use distinct keys and ids.
fn app() -> Router {
    TEST_ENV.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("PUBLIC_DIR", dir.path().join("public"));
        std::env::set_var("BACKUP_DIR", dir.path().join("backups"));
        store::init_store(Some(store::StoreConfig {
            root: dir.path().join("database"),
        }))
        .unwrap();
        dir
    });
    create_app()
}

async fn get(path: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post(path: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn delete(path: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_ping_responds_ok() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_page_is_served_as_default() {
    let (status, body) = get("/api/admin/pages/contact").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "contact");
    assert_eq!(body["title"], "Contact");
    assert_eq!(body["path"], "/contact");
    assert_eq!(body["sections"], json!([]));
    assert_eq!(body["metadata"]["title"], "Contact - Posta Vermaas");
    assert_eq!(body["settings"]["theme"], "auto");
    assert_eq!(body["settings"]["layout"], "default");
    assert_eq!(body["settings"]["showBreadcrumbs"], true);
    assert_eq!(body["settings"]["showFooter"], true);
}

#[tokio::test]
async fn invalid_page_id_is_rejected() {
    let (status, _) = get("/api/admin/pages/..%2fescape").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saving_a_page_denormalizes_blocks_into_sections() {
    let editor_page = json!({
        "id": "about",
        "title": "About Us",
        "slug": "/about",
        "type": "about",
        "status": "published",
        "created": "2025-01-01T00:00:00.000Z",
        "lastModified": "2025-01-01T00:00:00.000Z",
        "meta": {
            "title": "About Us - Posta Vermaas",
            "description": "Who we are",
            "keywords": ["audio"]
        },
        "blocks": [{
            "id": "company-stats",
            "type": "stats",
            "order": 0,
            "visible": true,
            "content": {
                "stats": [{ "label": "Projects", "value": "500+", "description": "completed" }]
            }
        }]
    });

    let (status, body) = post("/api/pages", editor_page).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Stored shape: stats back to number/label, name derived from the id,
    // visibility written out.
    let (status, stored) = get("/api/admin/pages/about").await;
    assert_eq!(status, StatusCode::OK);
    let section = &stored["sections"][0];
    assert_eq!(section["name"], "Company Stats");
    assert_eq!(
        section["content"]["stats"],
        json!([{ "number": "500+", "label": "Projects" }])
    );
    assert_eq!(section["settings"]["visibility"], "visible");
    assert_eq!(stored["metadata"]["canonical"], "/about");

    // And the editor listing normalizes it back with derived order.
    let (status, pages) = get("/api/pages").await;
    assert_eq!(status, StatusCode::OK);
    let page = pages
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "about")
        .expect("saved page is listed");
    assert_eq!(page["blocks"][0]["order"], 0);
    assert_eq!(page["blocks"][0]["visible"], true);
    assert_eq!(
        page["blocks"][0]["content"]["stats"],
        json!([{ "label": "Projects", "value": "500+", "description": "" }])
    );
}

#[tokio::test]
async fn rendered_page_contains_block_markup() {
    let editor_page = json!({
        "id": "facilities",
        "title": "Facilities",
        "slug": "/facilities",
        "type": "facilities",
        "status": "published",
        "created": "", "lastModified": "",
        "meta": { "title": "Facilities - Posta Vermaas", "description": "", "keywords": [] },
        "blocks": [{
            "id": "facilities-hero",
            "type": "hero",
            "order": 0,
            "visible": true,
            "content": { "title": "Our Facilities", "subtitle": "", "description": "" }
        }]
    });
    let (status, _) = post("/api/pages", editor_page).await;
    assert_eq!(status, StatusCode::OK);

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/pages/facilities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();
    assert!(html.contains("<title>Facilities - Posta Vermaas</title>"));
    assert!(html.contains("<h1>Our Facilities</h1>"));
}

#[tokio::test]
async fn database_add_update_delete_flow() {
    let (status, body) = post(
        "/api/admin/database/projects",
        json!({ "action": "add", "item": { "title": "Stille Nacht" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let id = body["data"][0]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, body) = post(
        "/api/admin/database/projects",
        json!({ "action": "update", "id": id, "item": { "title": "Stille Nacht II", "year": 2025 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], "Stille Nacht II");
    assert_eq!(body["data"][0]["year"], 2025);

    let (status, records) = get("/api/admin/database/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records.as_array().unwrap().len(), 1);

    let (status, body) = delete(&format!("/api/admin/database/projects?id={id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn database_bulk_delete_by_ids() {
    for name in ["Anna", "Bram"] {
        let (status, _) = post(
            "/api/admin/database/freelancers",
            json!({ "action": "add", "item": { "id": name.to_lowercase(), "name": name } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = delete("/api/admin/database/freelancers?ids=anna,bram").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "2 items deleted successfully");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn database_delete_requires_an_id() {
    let (status, body) = delete("/api/admin/database/people").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID or IDs parameter required");
}

#[tokio::test]
async fn unknown_database_kind_is_404() {
    let (status, body) = get("/api/admin/database/secrets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Database not found");
}

#[tokio::test]
async fn duplicate_role_id_is_rejected() {
    let (status, body) = post(
        "/api/admin/database/roles",
        json!({ "action": "add", "role": { "id": "re-recording-mix", "name": "Re-recording Mix" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = post(
        "/api/admin/database/roles",
        json!({ "action": "add", "role": { "id": "re-recording-mix", "name": "Again" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Role already exists");

    let (_, roles) = get("/api/admin/database/roles").await;
    let matching: Vec<_> = roles
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["id"] == "re-recording-mix")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["category"], "additional");
}

#[tokio::test]
async fn site_document_is_seeded_and_updatable() {
    let (status, site) = get("/api/site").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(site["company"]["name"], "Posta Vermaas");
    assert_eq!(site["locations"]["main"]["address"], "Koivistokade 58");

    let (status, body) = post(
        "/api/site",
        json!({ "section": "contact", "data": { "phone": "+31 20 555 0100" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, site) = get("/api/site").await;
    assert_eq!(site["contact"]["phone"], "+31 20 555 0100");
    // Other sections are untouched by a sectional update.
    assert_eq!(site["company"]["tagline"], "Sound for Picture");
}

#[tokio::test]
async fn navigation_document_is_seeded() {
    let (status, navigation) = get("/api/navigation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(navigation["main"][0]["name"], "Home");
    assert!(navigation["footer"].is_array());
}

#[tokio::test]
async fn upload_rejects_wrong_declared_type() {
    let (status, body) = upload("notes.txt", "text/plain", b"hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid file type");
}

#[tokio::test]
async fn upload_rejects_mismatched_content() {
    // Declared as PNG, but the bytes are not an image.
    let (status, body) = upload("fake.png", "image/png", b"plain text payload").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "File content does not match an allowed image type"
    );
}

#[tokio::test]
async fn upload_stores_a_png_and_returns_its_public_path() {
    let png: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    let (status, body) = upload("studio.png", "image/png", png).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "image/png");

    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/images/uploads/"));
    assert!(url.ends_with(".png"));

    let public = std::path::PathBuf::from(std::env::var("PUBLIC_DIR").unwrap());
    let on_disk = public.join(url.trim_start_matches('/'));
    assert!(on_disk.exists());
}

#[tokio::test]
async fn backup_snapshots_databases() {
    let (status, _) = post(
        "/api/admin/database/news",
        json!({ "action": "add", "item": { "title": "New Atmos stage", "content": "<p>Open!</p>" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post("/api/admin/database/backup", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let name = body["backupName"].as_str().unwrap();
    assert!(name.starts_with("backup-"));

    let (status, backups) = get("/api/admin/database/backup").await;
    assert_eq!(status, StatusCode::OK);
    assert!(backups
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["name"] == *name));
}

async fn upload(filename: &str, declared_type: &str, bytes: &[u8]) -> (StatusCode, Value) {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: {declared_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}
