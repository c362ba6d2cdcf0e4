use axum::{extract::State, http::StatusCode};

use crm_core::health::readiness;

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

/// 503 while the configured store cannot be reached.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.backend.ping().await)
}
