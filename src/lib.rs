pub mod config;
pub mod error;
pub mod observability;
pub mod routes;

use std::sync::Arc;

use savor_emissions::{
    Calculator, GenerativeConfig, GenerativeEstimator, NoEstimator, ReferenceTable,
};

pub use routes::{AppState, SharedEstimator};

/// Build the calculator described by the estimator configuration
///
/// Falls back to [`NoEstimator`] when enhanced estimation is disabled, has
/// no API key, or its HTTP client cannot be built.
pub fn build_calculator(config: &config::EstimatorConfig) -> Calculator<SharedEstimator> {
    let estimator: SharedEstimator = if config.is_usable() {
        match GenerativeEstimator::new(GenerativeConfig {
            endpoint: config.endpoint.to_owned(),
            model: config.model.to_owned(),
            api_key: config.api_key.to_owned(),
            timeout: config.timeout(),
        }) {
            Ok(estimator) => {
                tracing::info!(model = %config.model, "Enhanced portion estimation enabled");
                Arc::new(estimator)
            }
            Err(e) => {
                tracing::error!("Failed to build portion estimator: {e}");
                Arc::new(NoEstimator)
            }
        }
    } else {
        tracing::info!("Enhanced portion estimation disabled, using keyword fallback");
        Arc::new(NoEstimator)
    };

    Calculator::new(ReferenceTable::standard(), estimator)
}

/// Create app router for testing
///
/// Same routes and layers as the server, without binding a socket.
pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state).layer(tower_http::trace::TraceLayer::new_for_http())
}
