//! HTTP surface of the exporter

pub mod handlers;
pub mod routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::services::Services;

/// Creates the axum application with all routes and middleware
pub fn create_app(services: Services) -> Router {
    routes::routes(services).layer(TraceLayer::new_for_http())
}

#[cfg(any(test, feature = "mocks"))]
/// Create a test application
///
/// This function creates a test application with mock services.
pub async fn mock_app() -> Router {
    let services = Services::mocks().await;
    create_app(services)
}
