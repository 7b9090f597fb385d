use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, inspection};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Inspection operations
        .route("/samples", post(inspection::add_sample))
        .route("/samples/counts", get(inspection::sample_counts))
        .route("/train", post(inspection::train))
        .route("/predict", post(inspection::predict))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        // Browser capture UIs post from a different origin in development.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
