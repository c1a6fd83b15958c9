//! Quote orchestration service.
//!
//! Ties the allocator, builder, store, renderer, and mailer together. The
//! allocate->build->render->save cycle is where the numbering race is
//! resolved: the store's primary key rejects the loser, and the whole
//! cycle is retried with a freshly computed number.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::builder::build_quote;
use super::delivery::{QuoteMailer, QuoteRenderer};
use super::error::QuoteError;
use super::number::{self, DocumentNumberAllocator};
use super::store::QuoteStore;
use super::types::{CreateQuoteInput, NewQuote, Quote, StoredQuote};

/// How many allocate-and-save cycles to attempt before giving up.
///
/// Sustained collisions beyond this bound indicate contention heavy enough
/// (or a max-number query broken enough) that surfacing a server error is
/// more honest than spinning.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// A priced quote together with its rendered PDF.
#[derive(Debug, Clone)]
pub struct GeneratedQuote {
    /// The fully priced quote.
    pub quote: Quote,
    /// The rendered PDF document.
    pub pdf: Vec<u8>,
}

/// Orchestrates quote generation, preview, lookup, and delivery.
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    allocator: DocumentNumberAllocator,
    renderer: Arc<dyn QuoteRenderer>,
    mailer: Arc<dyn QuoteMailer>,
}

impl QuoteService {
    /// Creates a new quote service over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn QuoteStore>,
        renderer: Arc<dyn QuoteRenderer>,
        mailer: Arc<dyn QuoteMailer>,
    ) -> Self {
        Self {
            allocator: DocumentNumberAllocator::new(store.clone()),
            store,
            renderer,
            mailer,
        }
    }

    /// Prices, renders, and persists a quote.
    ///
    /// An explicit document number in the request bypasses allocation and
    /// is used as-is; a duplicate then surfaces directly without retrying,
    /// since the caller picked the number. Allocated numbers retry the full cycle
    /// on a duplicate key, up to [`MAX_ALLOCATION_ATTEMPTS`].
    ///
    /// # Errors
    ///
    /// Returns validation errors from the builder, `Render` when the PDF
    /// service fails (nothing is persisted in that case),
    /// `DuplicateDocumentNumber` for an explicit collision, or
    /// `AllocationExhausted` when allocation keeps colliding.
    pub async fn generate(&self, input: &CreateQuoteInput) -> Result<GeneratedQuote, QuoteError> {
        if let Some(requested) = number::explicit_number(input.document_number.as_deref()) {
            let requested = requested.to_string();
            return self.generate_with_number(input, &requested).await;
        }

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let document_number = self.allocator.next_number().await?;
            match self.generate_with_number(input, &document_number).await {
                Err(QuoteError::DuplicateDocumentNumber(number)) => {
                    warn!(
                        document_number = %number,
                        attempt,
                        "Allocated document number lost the race, reallocating"
                    );
                }
                result => return result,
            }
        }

        Err(QuoteError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// One allocate-less cycle: build, render, save.
    async fn generate_with_number(
        &self,
        input: &CreateQuoteInput,
        document_number: &str,
    ) -> Result<GeneratedQuote, QuoteError> {
        let quote = build_quote(input, document_number)?;
        // Render before persisting: a failed render must leave no record
        let pdf = self.renderer.render(&quote).await?;
        let record = NewQuote::from_request(input, &quote)?;
        self.store.save(record).await?;

        info!(document_number = %quote.document_number, total = %quote.total, "Quote saved");
        Ok(GeneratedQuote { quote, pdf })
    }

    /// Prices and renders a quote under a preview sentinel, persisting
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns builder validation errors or `Render`.
    pub async fn preview(&self, input: &CreateQuoteInput) -> Result<GeneratedQuote, QuoteError> {
        let document_number = number::preview_number(Utc::now());
        let quote = build_quote(input, &document_number)?;
        let pdf = self.renderer.render(&quote).await?;
        Ok(GeneratedQuote { quote, pdf })
    }

    /// Emails a stored quote, optionally attaching a freshly rendered PDF.
    ///
    /// Totals are recomputed from the stored raw request; stored summary
    /// columns are never trusted as pricing inputs.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown document number, and `Render` /
    /// `Mail` failures as-is; the quote is never marked sent on failure.
    pub async fn send_email(
        &self,
        to_email: &str,
        document_number: &str,
        attach_pdf: bool,
    ) -> Result<(), QuoteError> {
        let stored = self
            .store
            .find_by_document_number(document_number)
            .await?
            .ok_or_else(|| QuoteError::NotFound(document_number.to_string()))?;

        let input: CreateQuoteInput = serde_json::from_value(stored.request)
            .map_err(|e| QuoteError::Serialization(e.to_string()))?;
        let quote = build_quote(&input, document_number)?;

        let attachment = if attach_pdf {
            Some(self.renderer.render(&quote).await?)
        } else {
            None
        };

        self.mailer.send(to_email, &quote, attachment).await?;
        info!(document_number, to_email, "Quote emailed");
        Ok(())
    }

    /// Returns the stored raw request for a quote, if any.
    ///
    /// # Errors
    ///
    /// Returns a store error, or `Serialization` if the stored JSON no
    /// longer matches the request schema.
    pub async fn data(
        &self,
        document_number: &str,
    ) -> Result<Option<CreateQuoteInput>, QuoteError> {
        let Some(stored) = self.store.find_by_document_number(document_number).await? else {
            return Ok(None);
        };
        let input = serde_json::from_value(stored.request)
            .map_err(|e| QuoteError::Serialization(e.to_string()))?;
        Ok(Some(input))
    }

    /// Returns the stored summary record for a quote, if any.
    ///
    /// The summary columns are display data; totals must be recomputed from
    /// the raw request when they matter.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn summary(
        &self,
        document_number: &str,
    ) -> Result<Option<StoredQuote>, QuoteError> {
        Ok(self.store.find_by_document_number(document_number).await?)
    }

    /// Lists all stored quotes, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self) -> Result<Vec<StoredQuote>, QuoteError> {
        Ok(self.store.list_all_by_created_at_desc().await?)
    }

    /// Checks whether a quote exists.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn exists(&self, document_number: &str) -> Result<bool, QuoteError> {
        Ok(self.store.exists_by_document_number(document_number).await?)
    }

    /// Deletes a stored quote. Returns false when nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn delete(&self, document_number: &str) -> Result<bool, QuoteError> {
        let deleted = self.store.delete_by_document_number(document_number).await?;
        if deleted {
            info!(document_number, "Quote deleted");
        }
        Ok(deleted)
    }

    /// Returns the next document number without reserving it.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn next_number(&self) -> Result<String, QuoteError> {
        self.allocator.next_number().await
    }
}
