//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Reporting service identity.
    pub service: &'static str,
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check handler.
///
/// Liveness only; it does not probe the database or the render service.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "cotiza",
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_service_identity() {
        let Json(response) = health_check().await;
        assert_eq!(response.service, "cotiza");
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }
}
