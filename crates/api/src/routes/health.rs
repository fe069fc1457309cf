//! Liveness and readiness at `/health`.
//!
//! The service needs two things to do useful work: the database and a
//! writable upload directory. Either missing reports `degraded` with 503.

use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether `upload_path` is an existing, writable directory.
    pub storage_healthy: bool,
}

impl HealthReport {
    fn new(db_healthy: bool, storage_healthy: bool) -> Self {
        let status = if db_healthy && storage_healthy {
            "ok"
        } else {
            "degraded"
        };
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            storage_healthy,
        }
    }

    fn status_code(&self) -> StatusCode {
        if self.status == "ok" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn storage_is_writable(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Upload directory unavailable");
            false
        }
    }
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let db_healthy = match ports_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };
    let storage_healthy = storage_is_writable(&state.config.upload_path).await;
    let report = HealthReport::new(db_healthy, storage_healthy);
    (report.status_code(), Json(report))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
