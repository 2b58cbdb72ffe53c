//! Route definitions for the exporter

use axum::{routing::get, Router};

use super::handlers;
use crate::{constants::server::HEALTH_PATH, services::Services};

/// Creates the router with all exporter routes
pub fn routes(services: Services) -> Router {
    let metrics_path = services.metrics_path.clone();

    Router::new()
        .route("/", get(handlers::landing))
        .route(&metrics_path, get(handlers::metrics))
        .route(HEALTH_PATH, get(handlers::health_check))
        .with_state(services)
}
