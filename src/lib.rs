//! Posta Vermaas backend - library for app logic and testing

pub mod content;
pub mod logging;
pub mod models;
pub mod routes;
pub mod store;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

// Request bodies are capped just above the 10MB upload ceiling so multipart
// framing overhead doesn't reject a maximal image.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to the local dev frontend.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                "http://localhost:3000".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app() -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        .route("/api/logs", post(routes::logs::receive_client_logs))
        .route(
            "/api/pages",
            get(routes::pages::list_pages).post(routes::pages::save_page),
        )
        .route(
            "/api/admin/pages/{page_id}",
            get(routes::pages::get_stored_page).post(routes::pages::save_stored_page),
        )
        .route("/pages/{page_id}", get(routes::pages::view_page))
        .route(
            "/api/admin/database/roles",
            get(routes::roles::list_roles).post(routes::roles::update_roles),
        )
        .route(
            "/api/admin/database/backup",
            get(routes::backup::list_backups).post(routes::backup::create_backup),
        )
        .route(
            "/api/admin/database/{db_type}",
            get(routes::database::get_database)
                .post(routes::database::post_database)
                .delete(routes::database::delete_from_database),
        )
        .route("/api/admin/upload", post(routes::upload::upload_image))
        .route(
            "/api/site",
            get(routes::site::get_site).post(routes::site::update_site),
        )
        .route(
            "/api/navigation",
            get(routes::site::get_navigation).post(routes::site::update_navigation),
        )
        .route(
            "/api/content",
            get(routes::site::get_content).post(routes::site::update_content),
        )
        .route("/api/projects", get(routes::catalog::get_projects))
        .route("/api/people", get(routes::catalog::get_people))
        .route("/api/news", get(routes::catalog::get_news))
        .route(
            "/api/database",
            get(routes::catalog::get_raw_database).post(routes::catalog::save_raw_database),
        )
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .nest_service(
            "/images",
            ServeDir::new(routes::upload::public_dir().join("images")),
        )
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip automatically
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    match store::init_store(None) {
        Ok(store) => {
            tracing::info!("Document store ready at {:?}", store.root());
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize document store: {}. Continuing without store.",
                e
            );
        }
    }

    let app = create_app();

    // Bind address is configurable via HOST / PORT env vars, defaulting to
    // 127.0.0.1:3001 so existing dev setups keep working unchanged.
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
