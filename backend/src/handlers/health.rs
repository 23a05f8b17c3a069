//! Health endpoint for the AgroSmart backend
//!
//! Reports process liveness and whether the stock database is reachable,
//! for the platform's uptime checks.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Liveness probe with a database ping
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };

    Json(HealthResponse {
        status: "healthy",
        service: "agrosmart-backend",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
