//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
    pub request_id: String,
}

#[cfg(feature = "postgres")]
async fn storage_status(state: &AppState) -> &'static str {
    match &state.db {
        Some(db) => match db.main.ping().await {
            Ok(()) => "postgres",
            Err(e) => {
                tracing::error!("Database ping failed: {}", e);
                "postgres-unreachable"
            }
        },
        None => "in-memory",
    }
}

#[cfg(not(feature = "postgres"))]
async fn storage_status(_state: &AppState) -> &'static str {
    "in-memory"
}

/// Health check endpoint - returns server status.
///
/// GET /health/
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let storage = storage_status(&state).await;
    let response = HealthResponse {
        status: if storage == "postgres-unreachable" { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        storage,
        timestamp: chrono::Utc::now().to_rfc3339(),
        request_id: request_id.as_str().to_string(),
    };

    HttpResponse::Ok().json(response)
}
