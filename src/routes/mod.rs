use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use savor_emissions::{Calculator, PortionEstimator};

mod emissions;
mod health;

pub use emissions::{CalculateRequest, ImpactRequest};

pub type SharedEstimator = Arc<dyn PortionEstimator>;

#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<Calculator<SharedEstimator>>,
}

impl AppState {
    pub fn new(calculator: Calculator<SharedEstimator>) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/emissions/calculate", post(emissions::calculate))
        .route("/api/emissions/impact", post(emissions::impact))
        .with_state(app_state)
}
