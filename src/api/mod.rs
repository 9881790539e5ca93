//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::repository::BookRepository;

pub use routes::create_router;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn BookRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }
}

/// Build the full application: health check plus the versioned API with
/// its middleware stack.
pub fn build_app(state: AppState) -> Router {
    // Layers run outermost-last: context -> logging -> handler
    let api_routes = create_router()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::context_middleware));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
