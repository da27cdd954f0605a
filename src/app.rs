use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes::{food_routes, system_routes};
use crate::services::food_service::FoodService;

/// Build the complete Axum application:
/// - /foods    (food CRUD)
/// - /system   (alive, version, status)
///
/// `service` is cloned into each router; clones share one store.
pub fn build_app(service: FoodService, server_version: String) -> Router {
    Router::new()
        // /foods, /foods/:id
        .merge(food_routes::routes(service.clone()))

        // /system/*
        .nest("/system", system_routes::routes(server_version, service))

        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
