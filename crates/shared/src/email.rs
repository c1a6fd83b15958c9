//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. The transport itself is a black box;
//! this service only builds messages and hands them off.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    Build(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    Send(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::Send(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    /// Sends a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self
            .message_builder(to_email, subject)?
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.send(email).await
    }

    /// Sends a plain-text email with a PDF attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_email_with_pdf(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
        filename: &str,
        pdf_bytes: Vec<u8>,
    ) -> Result<(), EmailError> {
        let pdf_type =
            ContentType::parse("application/pdf").map_err(|e| EmailError::Build(e.to_string()))?;
        let attachment = Attachment::new(filename.to_string()).body(pdf_bytes, pdf_type);

        let email = self
            .message_builder(to_email, subject)?
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(attachment),
            )
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.send(email).await
    }

    fn message_builder(
        &self,
        to_email: &str,
        subject: &str,
    ) -> Result<lettre::message::MessageBuilder, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Ok(Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject))
    }

    async fn send(&self, email: Message) -> Result<(), EmailError> {
        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::Send(e.to_string()))?;

        Ok(())
    }
}
