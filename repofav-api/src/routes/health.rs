/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```
///
/// `database` is `"memory"` when the server runs on the in-memory store.

use crate::app::AppState;
use axum::{extract::State, Json};
use repofav_shared::db::pool::health_check as database_health_check;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected`, `disconnected` or `memory`
    pub database: String,
}

/// Health check handler; always 200, degraded when the database is down
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.stores.pool {
        Some(pool) => match database_health_check(pool).await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "disconnected"
            }
        },
        None => "memory",
    };

    Json(HealthResponse {
        status: if database == "disconnected" {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
