//! Quote error types for validation, allocation, and delivery failures.

use cotiza_shared::types::MoneyError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during quote operations.
#[derive(Debug, Error)]
pub enum QuoteError {
    // ========== Validation Errors ==========
    /// A quote must have at least one line item.
    #[error("A quote must have at least one item")]
    EmptyItemList,

    /// Item quantity must be positive.
    #[error("Item {line}: quantity must be greater than zero, got {quantity}")]
    InvalidQuantity {
        /// 1-based line number of the offending item.
        line: usize,
        /// The rejected quantity.
        quantity: Decimal,
    },

    /// Monetary validation or arithmetic failure. Always a caller bug or
    /// bad input; never retried.
    #[error(transparent)]
    Money(#[from] MoneyError),

    // ========== Numbering Errors ==========
    /// The document number is already taken.
    #[error("Document number already exists: {0}")]
    DuplicateDocumentNumber(String),

    /// Allocation kept colliding with concurrent writers.
    #[error("Could not allocate a document number after {attempts} attempts")]
    AllocationExhausted {
        /// How many allocate-and-save cycles were attempted.
        attempts: u32,
    },

    // ========== Lookup Errors ==========
    /// No quote stored under the given document number.
    #[error("Quote not found: {0}")]
    NotFound(String),

    // ========== Collaborator Errors ==========
    /// The render service failed; nothing was persisted or sent.
    #[error("Render failed: {0}")]
    Render(String),

    /// Mail delivery failed; the quote is not marked as sent.
    #[error("Mail delivery failed: {0}")]
    Mail(String),

    /// The stored raw request could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage failure other than a duplicate key.
    #[error("Storage error: {0}")]
    Store(String),
}

impl QuoteError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyItemList => "EMPTY_ITEM_LIST",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::Money(e) => match e {
                MoneyError::InvalidAmount(_) => "INVALID_AMOUNT",
                MoneyError::InvalidCurrency(_) => "INVALID_CURRENCY",
                MoneyError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
                MoneyError::NegativeResult { .. } => "NEGATIVE_RESULT",
            },
            Self::DuplicateDocumentNumber(_) => "DUPLICATE_DOCUMENT_NUMBER",
            Self::AllocationExhausted { .. } => "ALLOCATION_EXHAUSTED",
            Self::NotFound(_) => "QUOTE_NOT_FOUND",
            Self::Render(_) => "RENDER_FAILED",
            Self::Mail(_) => "MAIL_FAILED",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyItemList | Self::InvalidQuantity { .. } | Self::Money(_) => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict - duplicate key
            Self::DuplicateDocumentNumber(_) => 409,

            // 500 Internal Server Error
            Self::AllocationExhausted { .. }
            | Self::Render(_)
            | Self::Mail(_)
            | Self::Serialization(_)
            | Self::Store(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Only the duplicate-key race is worth retrying; everything else is
    /// either bad input or a collaborator outage.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateDocumentNumber(_))
    }
}

impl From<StoreError> for QuoteError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateDocumentNumber(n) => Self::DuplicateDocumentNumber(n),
            StoreError::Database(msg) => Self::Store(msg),
        }
    }
}
