//! HTTP client for the external PDF render service.
//!
//! The render service owns all layout concerns; this adapter only posts the
//! priced quote as JSON and hands back the PDF bytes.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use cotiza_core::quote::{Quote, QuoteRenderer, RenderError};
use cotiza_shared::config::RendererConfig;

/// Render-service client.
#[derive(Clone)]
pub struct HttpQuoteRenderer {
    endpoint: String,
    http_client: Client,
}

impl HttpQuoteRenderer {
    /// Creates a new render client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RenderError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.url.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl QuoteRenderer for HttpQuoteRenderer {
    async fn render(&self, quote: &Quote) -> Result<Vec<u8>, RenderError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(quote)
            .send()
            .await
            .map_err(|e| RenderError(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RenderError(format!("Render service returned {status}: {body}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError(format!("Failed to read response body: {e}")))?;

        debug!(
            document_number = %quote.document_number,
            size = bytes.len(),
            "Quote rendered"
        );
        Ok(bytes.to_vec())
    }
}
