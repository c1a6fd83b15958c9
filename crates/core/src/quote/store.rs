//! Persistence port for quote records.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{NewQuote, StoredQuote};

/// Errors surfaced by a quote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this document number already exists. This is the
    /// signal the allocator's caller retries on.
    #[error("Duplicate document number: {0}")]
    DuplicateDocumentNumber(String),

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

/// Durable store for quotes, keyed by document number.
///
/// Implementations must reject duplicate document numbers distinguishably
/// (`StoreError::DuplicateDocumentNumber`): the primary key is the arbiter
/// of the allocation race described in [`super::service`].
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Persists a new quote record.
    async fn save(&self, quote: NewQuote) -> Result<StoredQuote, StoreError>;

    /// Looks up a quote by document number.
    async fn find_by_document_number(
        &self,
        document_number: &str,
    ) -> Result<Option<StoredQuote>, StoreError>;

    /// Checks whether a quote exists.
    async fn exists_by_document_number(&self, document_number: &str) -> Result<bool, StoreError>;

    /// Deletes a quote. Returns false when nothing was stored under the
    /// given number.
    async fn delete_by_document_number(&self, document_number: &str) -> Result<bool, StoreError>;

    /// Lists all quotes, most recently created first.
    async fn list_all_by_created_at_desc(&self) -> Result<Vec<StoredQuote>, StoreError>;

    /// Returns the maximum numeric document number, or `None` when no
    /// numeric numbers exist. Non-numeric identifiers (including
    /// "PREVIEW-*" sentinels, which are never persisted anyway) must be
    /// excluded from the computation.
    async fn max_numeric_document_number(&self) -> Result<Option<i32>, StoreError>;
}
