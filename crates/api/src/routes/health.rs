//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::time::Instant;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// GET /api/health
///
/// Reports overall service health including database connectivity.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();
    let db_result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status_code, status, database) = match db_result {
        Ok(_) => (
            StatusCode::OK,
            "healthy".to_string(),
            DatabaseHealth {
                connected: true,
                latency_ms: Some(latency_ms),
            },
        ),
        Err(err) => {
            tracing::error!(error = %err, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "unhealthy".to_string(),
                DatabaseHealth {
                    connected: false,
                    latency_ms: None,
                },
            )
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        }),
    )
}

/// GET /api/health/ready
///
/// Readiness probe: succeeds only when the database is reachable.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /api/health/live
///
/// Liveness probe: always succeeds while the process is running.
pub async fn live() -> StatusCode {
    StatusCode::OK
}
