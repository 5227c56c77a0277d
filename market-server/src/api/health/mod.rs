//! Health check routes
//!
//! | Path | Method | Description | Auth |
//! |------|--------|-------------|------|
//! | /health | GET | Liveness check | none |
//! | /health/detailed | GET | Component checks | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// Health routes - public (no authentication)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    latency_ms: Option<u64>,
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

/// Basic liveness check
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

/// Detailed health check with a database round trip
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let db_start = std::time::Instant::now();
    let db_check = match state.db.query("RETURN 1").await {
        Ok(_) => CheckResult::ok_with_latency(db_start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(format!("Database error: {}", e)),
    };

    let all_ok = db_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { database: db_check },
    })
}
