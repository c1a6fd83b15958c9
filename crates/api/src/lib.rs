//! HTTP API layer with Axum routes and delivery adapters.
//!
//! This crate provides:
//! - REST API routes for quote generation and delivery
//! - The HTTP render-service client
//! - The SMTP mail adapter

pub mod mailer;
pub mod render;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use cotiza_core::QuoteService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The quote service orchestrating all quote operations.
    pub quotes: Arc<QuoteService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
