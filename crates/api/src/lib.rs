//! HTTP API layer with Axum routes.
//!
//! Exposes the billing computations as stateless endpoints. Persistence,
//! authentication, and row scoping live with the hosted backend the SPA
//! talks to directly; every handler here is a pure function of its request
//! body.

pub mod routes;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the main application router.
#[must_use]
pub fn create_router() -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
