//! Liveness endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Liveness report.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Backend holding the answers (`gist` or `memory`)
    pub store: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Reports the process as up without touching the store.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.name(),
    })
}
