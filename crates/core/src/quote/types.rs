//! Quote request and domain types.
//!
//! `CreateQuoteInput` is the raw request and the persisted source of truth:
//! it round-trips through serde unchanged, and totals are recomputed from it
//! on every use. `Quote` is the fully priced, immutable result.

use chrono::{DateTime, NaiveDate, Utc};
use cotiza_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::QuoteError;

/// Default unit of measure for line items.
pub const DEFAULT_UNIT_MEASURE: &str = "UND";
/// Default payment condition.
pub const DEFAULT_PAYMENT_CONDITION: &str = "CONTADO";
/// Default delivery time.
pub const DEFAULT_DELIVERY_TIME: &str = "ON IMMEDIATE STOCK";
/// Default warranty.
pub const DEFAULT_WARRANTY: &str = "12 MONTHS";
/// Default number of days a quote remains valid.
pub const DEFAULT_VALIDITY_DAYS: i32 = 4;

/// Maximum stored length of the first-item summary column.
const SUMMARY_DESCRIPTION_MAX: usize = 50;

/// A raw line item as received in a quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItemInput {
    /// Product code.
    pub code: Option<String>,
    /// Item description.
    pub description: Option<String>,
    /// Unit of measure; defaults to "UND" when absent.
    pub unit_measure: Option<String>,
    /// Quantity, must be > 0.
    pub quantity: Decimal,
    /// Unit price, must be >= 0.
    pub unit_price: Decimal,
}

/// A raw quote request.
///
/// Every optional field has a documented default applied by the totals
/// builder; the request itself is stored verbatim so that totals can always
/// be re-derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateQuoteInput {
    /// Explicit document number, or the "XXXXX" placeholder / absent to
    /// have one allocated.
    pub document_number: Option<String>,
    /// Document date; defaults to today.
    pub document_date: Option<NaiveDate>,
    /// Validity date; defaults to today + 4 days.
    pub valid_until: Option<NaiveDate>,
    /// Currency; defaults to PEN.
    pub currency: Option<Currency>,

    /// Client name.
    pub client_name: Option<String>,
    /// Client tax ID (RUC).
    pub client_ruc: Option<String>,
    /// Client address.
    pub client_address: Option<String>,
    /// Client phone.
    pub client_phone: Option<String>,
    /// Client email.
    pub client_email: Option<String>,
    /// Client reference.
    pub client_reference: Option<String>,
    /// Client mobile.
    pub client_mobile: Option<String>,
    /// Salesperson name.
    pub salesperson: Option<String>,
    /// Attention line.
    pub attention: Option<String>,

    /// Line items; a quote must have at least one.
    pub items: Vec<QuoteItemInput>,

    /// Payment condition; defaults to "CONTADO".
    pub payment_condition: Option<String>,
    /// Validity in days; defaults to 4.
    pub validity_days: Option<i32>,
    /// Delivery time; defaults to "ON IMMEDIATE STOCK".
    pub delivery_time: Option<String>,
    /// Warranty; defaults to "12 MONTHS".
    pub warranty: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// A priced line item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    /// Product code.
    pub code: Option<String>,
    /// Item description.
    pub description: Option<String>,
    /// Unit of measure.
    pub unit_measure: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// `round(quantity * unit_price, 2, half-up)`.
    pub subtotal: Decimal,
}

/// A fully priced quote, ready for rendering or delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique document number: 5-digit zero-padded, or a "PREVIEW-*"
    /// sentinel for render-and-discard flows.
    pub document_number: String,
    /// Document date.
    pub document_date: NaiveDate,
    /// Date until which the quote is valid.
    pub valid_until: NaiveDate,
    /// Quote currency.
    pub currency: Currency,

    /// Client name.
    pub client_name: Option<String>,
    /// Client tax ID (RUC).
    pub client_ruc: Option<String>,
    /// Client address.
    pub client_address: Option<String>,
    /// Client phone.
    pub client_phone: Option<String>,
    /// Client email.
    pub client_email: Option<String>,
    /// Client reference.
    pub client_reference: Option<String>,
    /// Client mobile.
    pub client_mobile: Option<String>,
    /// Salesperson name.
    pub salesperson: Option<String>,
    /// Attention line.
    pub attention: Option<String>,

    /// Priced line items, never empty.
    pub items: Vec<QuoteItem>,

    /// Sum of item subtotals.
    pub subtotal: Decimal,
    /// `round(subtotal * 0.18, 2, half-up)`.
    pub igv: Decimal,
    /// `subtotal + igv`.
    pub total: Decimal,

    /// Payment condition.
    pub payment_condition: String,
    /// Validity in days.
    pub validity_days: i32,
    /// Delivery time.
    pub delivery_time: String,
    /// Warranty.
    pub warranty: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// A quote record ready to persist: the raw request plus summary columns
/// for list views.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    /// Document number, the primary key.
    pub document_number: String,
    /// The raw request, stored verbatim as JSON.
    pub request: serde_json::Value,
    /// Client name summary column.
    pub client_name: Option<String>,
    /// Currency summary column.
    pub currency: Currency,
    /// Grand total summary column.
    pub total: Decimal,
    /// Number of line items.
    pub item_count: i32,
    /// First item description, truncated for display.
    pub first_item_description: Option<String>,
}

/// A persisted quote record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredQuote {
    /// Document number, the primary key.
    pub document_number: String,
    /// The raw request as stored.
    pub request: serde_json::Value,
    /// Client name summary column.
    pub client_name: Option<String>,
    /// Currency summary column.
    pub currency: Currency,
    /// Grand total summary column.
    pub total: Decimal,
    /// Number of line items.
    pub item_count: i32,
    /// First item description, truncated for display.
    pub first_item_description: Option<String>,
    /// Set by the store on insert.
    pub created_at: DateTime<Utc>,
    /// Set by the store on update.
    pub updated_at: DateTime<Utc>,
}

impl NewQuote {
    /// Builds a persistence record from a raw request and its priced quote.
    ///
    /// The raw request is the source of truth; the priced quote only feeds
    /// the derived summary columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized to JSON.
    pub fn from_request(input: &CreateQuoteInput, quote: &Quote) -> Result<Self, QuoteError> {
        let request = serde_json::to_value(input)
            .map_err(|e| QuoteError::Serialization(e.to_string()))?;

        let first_item_description = input
            .items
            .first()
            .and_then(|item| item.description.as_deref())
            .map(truncate_description);

        Ok(Self {
            document_number: quote.document_number.clone(),
            request,
            client_name: input.client_name.clone(),
            currency: quote.currency,
            total: quote.total,
            item_count: i32::try_from(input.items.len()).unwrap_or(i32::MAX),
            first_item_description,
        })
    }
}

/// Truncates a description to fit the summary column.
fn truncate_description(description: &str) -> String {
    if description.chars().count() > SUMMARY_DESCRIPTION_MAX {
        let head: String = description.chars().take(SUMMARY_DESCRIPTION_MAX - 3).collect();
        format!("{head}...")
    } else {
        description.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn one_item_input(description: &str) -> CreateQuoteInput {
        CreateQuoteInput {
            client_name: Some("ACME SAC".to_string()),
            items: vec![QuoteItemInput {
                code: None,
                description: Some(description.to_string()),
                unit_measure: None,
                quantity: dec!(1),
                unit_price: dec!(10),
            }],
            ..CreateQuoteInput::default()
        }
    }

    #[test]
    fn test_request_json_round_trip() {
        let input = one_item_input("Industrial valve");
        let json = serde_json::to_value(&input).unwrap();
        let back: CreateQuoteInput = serde_json::from_value(json).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn test_new_quote_summary_columns() {
        let input = one_item_input("Industrial valve");
        let quote = crate::quote::build_quote(&input, "00007").unwrap();
        let record = NewQuote::from_request(&input, &quote).unwrap();

        assert_eq!(record.document_number, "00007");
        assert_eq!(record.client_name.as_deref(), Some("ACME SAC"));
        assert_eq!(record.item_count, 1);
        assert_eq!(record.total, quote.total);
        assert_eq!(
            record.first_item_description.as_deref(),
            Some("Industrial valve")
        );
    }

    #[test]
    fn test_first_item_description_is_truncated() {
        let long = "X".repeat(80);
        let input = one_item_input(&long);
        let quote = crate::quote::build_quote(&input, "00001").unwrap();
        let record = NewQuote::from_request(&input, &quote).unwrap();

        let summary = record.first_item_description.unwrap();
        assert_eq!(summary.chars().count(), 50);
        assert!(summary.ends_with("..."));
    }
}
