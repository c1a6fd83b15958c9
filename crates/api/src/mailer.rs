//! SMTP mail adapter for quote delivery.

use async_trait::async_trait;
use std::sync::Arc;

use cotiza_core::quote::{MailError, Quote, QuoteMailer};
use cotiza_shared::EmailService;

/// Sends quotes by email through the shared SMTP service.
#[derive(Clone)]
pub struct SmtpQuoteMailer {
    email_service: Arc<EmailService>,
}

impl SmtpQuoteMailer {
    /// Creates a new mailer over the shared email service.
    #[must_use]
    pub fn new(email_service: Arc<EmailService>) -> Self {
        Self { email_service }
    }

    fn subject(quote: &Quote) -> String {
        format!("Quotation COT-{}", quote.document_number)
    }

    fn body(quote: &Quote) -> String {
        let client = quote.client_name.as_deref().unwrap_or("client");
        format!(
            "Dear {client},\n\n\
             Please find quotation COT-{} for a total of {} {}.\n\
             This quotation is valid until {}.\n\n\
             Best regards,\n\
             Sales Team",
            quote.document_number, quote.currency, quote.total, quote.valid_until
        )
    }
}

#[async_trait]
impl QuoteMailer for SmtpQuoteMailer {
    async fn send(
        &self,
        to_email: &str,
        quote: &Quote,
        attachment: Option<Vec<u8>>,
    ) -> Result<(), MailError> {
        let subject = Self::subject(quote);
        let body = Self::body(quote);

        let result = match attachment {
            Some(pdf_bytes) => {
                let filename = format!("COT-{}.pdf", quote.document_number);
                self.email_service
                    .send_email_with_pdf(to_email, &subject, &body, &filename, pdf_bytes)
                    .await
            }
            None => self.email_service.send_email(to_email, &subject, &body).await,
        };

        result.map_err(|e| MailError(e.to_string()))
    }
}
