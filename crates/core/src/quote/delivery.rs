//! Rendering and mail ports.
//!
//! Both collaborators are black boxes: the renderer turns a priced quote
//! into PDF bytes, the mailer delivers it. Their internals (template
//! layout, SMTP transport) are out of scope for the core.

use async_trait::async_trait;
use thiserror::Error;

use super::types::Quote;

/// Render service failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Mail delivery failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MailError(pub String);

/// Produces a PDF document from a priced quote.
///
/// Treated as a pure function of the quote value: rendering the same quote
/// twice yields an equivalent document.
#[async_trait]
pub trait QuoteRenderer: Send + Sync {
    /// Renders the quote to PDF bytes.
    async fn render(&self, quote: &Quote) -> Result<Vec<u8>, RenderError>;
}

/// Delivers a quote to a client by email, optionally with the rendered PDF
/// attached.
#[async_trait]
pub trait QuoteMailer: Send + Sync {
    /// Sends the quote to `to_email`.
    async fn send(
        &self,
        to_email: &str,
        quote: &Quote,
        attachment: Option<Vec<u8>>,
    ) -> Result<(), MailError>;
}

impl From<RenderError> for super::error::QuoteError {
    fn from(e: RenderError) -> Self {
        Self::Render(e.0)
    }
}

impl From<MailError> for super::error::QuoteError {
    fn from(e: MailError) -> Self {
        Self::Mail(e.0)
    }
}
