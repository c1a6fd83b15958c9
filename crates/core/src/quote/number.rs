//! Document number formatting and allocation.
//!
//! Persisted document numbers are 5-digit zero-padded decimals ("00001",
//! "00042"). Previews use a "PREVIEW-<millis>" sentinel that is never
//! persisted. Allocation is max+1 over the store and is NOT atomic; the
//! caller handles the duplicate-key race (see [`super::service`]).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::QuoteError;
use super::store::QuoteStore;

/// Width of a persisted document number.
pub const NUMBER_WIDTH: usize = 5;

/// Reserved placeholder meaning "allocate a number for me".
pub const NUMBER_PLACEHOLDER: &str = "XXXXX";

/// Prefix of non-persisted preview sentinels.
pub const PREVIEW_PREFIX: &str = "PREVIEW-";

/// Formats a numeric document number as fixed-width zero-padded decimal.
#[must_use]
pub fn format_document_number(n: i32) -> String {
    format!("{n:0NUMBER_WIDTH$}")
}

/// Returns true for a well-formed persisted document number (`^\d{5}$`).
#[must_use]
pub fn is_persisted_number(s: &str) -> bool {
    s.len() == NUMBER_WIDTH && s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true for a preview sentinel (`^PREVIEW-\d+$`).
#[must_use]
pub fn is_preview_number(s: &str) -> bool {
    s.strip_prefix(PREVIEW_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Builds a preview sentinel for a render-and-discard flow.
#[must_use]
pub fn preview_number(now: DateTime<Utc>) -> String {
    format!("{PREVIEW_PREFIX}{}", now.timestamp_millis())
}

/// Extracts an explicitly requested document number.
///
/// Returns `None` when the request left the number blank or carried the
/// reserved placeholder, i.e. when a number should be allocated instead.
/// No uniqueness check happens here; the store's primary key enforces it
/// at persistence time.
#[must_use]
pub fn explicit_number(requested: Option<&str>) -> Option<&str> {
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != NUMBER_PLACEHOLDER)
}

/// Allocates the next sequential document number from persisted state.
#[derive(Clone)]
pub struct DocumentNumberAllocator {
    store: Arc<dyn QuoteStore>,
}

impl DocumentNumberAllocator {
    /// Creates an allocator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Computes the next document number: store max (previews excluded by
    /// the store query), defaulting to 0, plus one.
    ///
    /// Two concurrent callers can observe the same maximum; the resulting
    /// duplicate key is caught at save time and retried by the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn next_number(&self) -> Result<String, QuoteError> {
        let max = self.store.max_numeric_document_number().await?.unwrap_or(0);
        Ok(format_document_number(max + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::store::{QuoteStore, StoreError};
    use crate::quote::types::{NewQuote, StoredQuote};
    use async_trait::async_trait;

    /// Store fake that only answers the max-number query.
    struct FixedMaxStore(Option<i32>);

    #[async_trait]
    impl QuoteStore for FixedMaxStore {
        async fn save(&self, _quote: NewQuote) -> Result<StoredQuote, StoreError> {
            unimplemented!("not used by allocator tests")
        }
        async fn find_by_document_number(
            &self,
            _document_number: &str,
        ) -> Result<Option<StoredQuote>, StoreError> {
            Ok(None)
        }
        async fn exists_by_document_number(
            &self,
            _document_number: &str,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn delete_by_document_number(
            &self,
            _document_number: &str,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn list_all_by_created_at_desc(&self) -> Result<Vec<StoredQuote>, StoreError> {
            Ok(vec![])
        }
        async fn max_numeric_document_number(&self) -> Result<Option<i32>, StoreError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_format_document_number() {
        assert_eq!(format_document_number(1), "00001");
        assert_eq!(format_document_number(42), "00042");
        assert_eq!(format_document_number(99999), "99999");
    }

    #[test]
    fn test_is_persisted_number() {
        assert!(is_persisted_number("00001"));
        assert!(is_persisted_number("99999"));
        assert!(!is_persisted_number("0001"));
        assert!(!is_persisted_number("000001"));
        assert!(!is_persisted_number("0000A"));
        assert!(!is_persisted_number("PREVIEW-1700000000000"));
    }

    #[test]
    fn test_is_preview_number() {
        assert!(is_preview_number("PREVIEW-1700000000000"));
        assert!(!is_preview_number("PREVIEW-"));
        assert!(!is_preview_number("PREVIEW-abc"));
        assert!(!is_preview_number("00001"));
    }

    #[test]
    fn test_preview_number_format() {
        let now = Utc::now();
        let number = preview_number(now);
        assert!(is_preview_number(&number));
        assert_eq!(
            number,
            format!("PREVIEW-{}", now.timestamp_millis())
        );
    }

    #[test]
    fn test_explicit_number() {
        assert_eq!(explicit_number(Some("00123")), Some("00123"));
        assert_eq!(explicit_number(Some(" 00123 ")), Some("00123"));
        assert_eq!(explicit_number(Some("XXXXX")), None);
        assert_eq!(explicit_number(Some("")), None);
        assert_eq!(explicit_number(Some("   ")), None);
        assert_eq!(explicit_number(None), None);
    }

    #[tokio::test]
    async fn test_next_number_on_empty_store() {
        let allocator = DocumentNumberAllocator::new(Arc::new(FixedMaxStore(None)));
        assert_eq!(allocator.next_number().await.unwrap(), "00001");
    }

    #[tokio::test]
    async fn test_next_number_increments_max() {
        let allocator = DocumentNumberAllocator::new(Arc::new(FixedMaxStore(Some(42))));
        assert_eq!(allocator.next_number().await.unwrap(), "00043");
    }
}
