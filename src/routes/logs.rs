/**
 * Logs Route Handler
 * Receives batched client logs from the admin frontend
 */
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use tower_http::request_id::RequestId;

use crate::logging::config::{ClientLogBatch, ClientLogEntry, LogLevel, LogResponse};

/// POST /api/logs
#[tracing::instrument(skip(batch), fields(batch_size = batch.logs.len()))]
pub async fn receive_client_logs(
    request_id: Option<Extension<RequestId>>,
    Json(batch): Json<ClientLogBatch>,
) -> impl IntoResponse {
    let request_id = request_id
        .as_ref()
        .and_then(|ext| ext.0.header_value().to_str().ok())
        .unwrap_or("unknown");

    tracing::info!(
        request_id = %request_id,
        batch_size = batch.logs.len(),
        "received client logs"
    );

    for entry in &batch.logs {
        replay_client_log(entry, request_id);
    }

    let received = batch.logs.len();
    (
        StatusCode::ACCEPTED,
        Json(LogResponse {
            success: true,
            received,
            processed: received,
            error: None,
        }),
    )
}

/// Replay one client entry into the server-side subscriber at its level.
fn replay_client_log(entry: &ClientLogEntry, request_id: &str) {
    let span = tracing::info_span!(
        "client_log",
        request_id = %request_id,
        timestamp = %entry.timestamp,
        source = "client",
    );
    let _enter = span.enter();

    match entry.level {
        LogLevel::Trace => tracing::trace!(
            message = %entry.message,
            context = ?entry.context,
            metadata = ?entry.metadata,
            "client log"
        ),
        LogLevel::Debug => tracing::debug!(
            message = %entry.message,
            context = ?entry.context,
            metadata = ?entry.metadata,
            "client log"
        ),
        LogLevel::Info => tracing::info!(
            message = %entry.message,
            context = ?entry.context,
            metadata = ?entry.metadata,
            "client log"
        ),
        LogLevel::Warn => tracing::warn!(
            message = %entry.message,
            context = ?entry.context,
            metadata = ?entry.metadata,
            "client log"
        ),
        LogLevel::Error => tracing::error!(
            message = %entry.message,
            context = ?entry.context,
            metadata = ?entry.metadata,
            "client log"
        ),
    }
}
