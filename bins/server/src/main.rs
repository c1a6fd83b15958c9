//! Cotiza API Server
//!
//! Main entry point for the Cotiza quotation backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cotiza_api::{AppState, create_router, mailer::SmtpQuoteMailer, render::HttpQuoteRenderer};
use cotiza_core::QuoteService;
use cotiza_db::{QuoteRepository, connect};
use cotiza_shared::{AppConfig, EmailService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cotiza=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Render service client
    let renderer = HttpQuoteRenderer::new(&config.renderer)
        .map_err(|e| anyhow::anyhow!("Failed to create render client: {e}"))?;
    info!(url = %config.renderer.url, "Render service configured");

    // Email service
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );
    let mailer = SmtpQuoteMailer::new(Arc::new(email_service));

    // Wire the quote service
    let quotes = QuoteService::new(
        Arc::new(QuoteRepository::new(db)),
        Arc::new(renderer),
        Arc::new(mailer),
    );

    // Create application state
    let state = AppState {
        quotes: Arc::new(quotes),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
