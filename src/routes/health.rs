use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::routes::AppState;

/// GET /health - Liveness probe
/// Returns 200 OK if the process is alive
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
///
/// The deterministic path needs nothing external, so the service is always
/// ready; the payload reports whether enhanced estimation is wired in.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let calculator = &state.calculator;

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "enhancedEstimation": calculator.estimator().is_available(),
            "referenceCategories": calculator.aggregator().table().len(),
        })),
    )
}
