//! The quote totals builder.
//!
//! A pure function from a raw request (plus a document number) to a fully
//! priced quote: identical inputs produce bit-identical monetary outputs.
//! The preview/download/email flows all rely on this to recompute the same
//! totals from the stored raw request.

use chrono::{Duration, Utc};
use cotiza_shared::types::{Money, round_half_up};
use rust_decimal::Decimal;

use super::error::QuoteError;
use super::types::{
    CreateQuoteInput, DEFAULT_DELIVERY_TIME, DEFAULT_PAYMENT_CONDITION, DEFAULT_UNIT_MEASURE,
    DEFAULT_VALIDITY_DAYS, DEFAULT_WARRANTY, Quote, QuoteItem,
};

/// Prices a raw quote request.
///
/// Per item: `subtotal = round(quantity * unit_price, 2, half-up)`.
/// Aggregate subtotal is the plain sum of the already-rounded line
/// subtotals (round-then-sum; each addend is 2-decimal exact). IGV is
/// rounded once, on the aggregate. This ordering is intentional and must
/// not be "fixed".
///
/// # Errors
///
/// Returns `EmptyItemList` when the request has no items,
/// `InvalidQuantity` for non-positive quantities, and a `Money` error for
/// negative prices.
pub fn build_quote(input: &CreateQuoteInput, document_number: &str) -> Result<Quote, QuoteError> {
    if input.items.is_empty() {
        return Err(QuoteError::EmptyItemList);
    }

    let currency = input.currency.unwrap_or_default();

    let mut items = Vec::with_capacity(input.items.len());
    let mut subtotal = Money::zero(currency);

    for (index, item) in input.items.iter().enumerate() {
        if item.quantity <= Decimal::ZERO {
            return Err(QuoteError::InvalidQuantity {
                line: index + 1,
                quantity: item.quantity,
            });
        }

        // Negative unit prices are rejected here: the product is negative,
        // and Money cannot hold a negative amount.
        let line_subtotal = Money::new(round_half_up(item.quantity * item.unit_price), currency)?;
        subtotal = subtotal.add(&line_subtotal)?;

        items.push(QuoteItem {
            code: item.code.clone(),
            description: item.description.clone(),
            unit_measure: or_default(item.unit_measure.as_deref(), DEFAULT_UNIT_MEASURE),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: line_subtotal.amount,
        });
    }

    let igv = subtotal.apply_igv().rounded();
    let total = subtotal.add(&igv)?;

    let today = Utc::now().date_naive();

    Ok(Quote {
        document_number: document_number.to_string(),
        document_date: input.document_date.unwrap_or(today),
        valid_until: input
            .valid_until
            .unwrap_or(today + Duration::days(i64::from(DEFAULT_VALIDITY_DAYS))),
        currency,
        client_name: input.client_name.clone(),
        client_ruc: input.client_ruc.clone(),
        client_address: input.client_address.clone(),
        client_phone: input.client_phone.clone(),
        client_email: input.client_email.clone(),
        client_reference: input.client_reference.clone(),
        client_mobile: input.client_mobile.clone(),
        salesperson: input.salesperson.clone(),
        attention: input.attention.clone(),
        items,
        subtotal: subtotal.amount,
        igv: igv.amount,
        total: total.amount,
        payment_condition: or_default(
            input.payment_condition.as_deref(),
            DEFAULT_PAYMENT_CONDITION,
        ),
        validity_days: input.validity_days.unwrap_or(DEFAULT_VALIDITY_DAYS),
        delivery_time: or_default(input.delivery_time.as_deref(), DEFAULT_DELIVERY_TIME),
        warranty: or_default(input.warranty.as_deref(), DEFAULT_WARRANTY),
        notes: input.notes.clone(),
    })
}

/// Falls back to `default` when the field is absent or blank.
fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::QuoteItemInput;
    use chrono::NaiveDate;
    use cotiza_shared::types::{Currency, MoneyError};
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal) -> QuoteItemInput {
        QuoteItemInput {
            code: None,
            description: None,
            unit_measure: None,
            quantity,
            unit_price,
        }
    }

    fn input_with_items(items: Vec<QuoteItemInput>) -> CreateQuoteInput {
        CreateQuoteInput {
            items,
            ..CreateQuoteInput::default()
        }
    }

    #[test]
    fn test_reference_totals() {
        // 2 x 10.00 = 20.00; 1 x 5.005 rounds half-up to 5.01
        let input = input_with_items(vec![
            item(dec!(2), dec!(10.00)),
            item(dec!(1), dec!(5.005)),
        ]);
        let quote = build_quote(&input, "00001").unwrap();

        assert_eq!(quote.items[0].subtotal, dec!(20.00));
        assert_eq!(quote.items[1].subtotal, dec!(5.01));
        assert_eq!(quote.subtotal, dec!(25.01));
        assert_eq!(quote.igv, dec!(4.50));
        assert_eq!(quote.total, dec!(29.51));
    }

    #[test]
    fn test_total_is_subtotal_plus_igv() {
        let input = input_with_items(vec![item(dec!(3), dec!(19.99))]);
        let quote = build_quote(&input, "00001").unwrap();
        assert_eq!(quote.total, quote.subtotal + quote.igv);
        assert_eq!(quote.igv, round_half_up(quote.subtotal * dec!(0.18)));
    }

    #[test]
    fn test_lines_round_before_summation() {
        // Each line rounds 10.004 down to 10.00; summing first would give
        // 20.008 -> 20.01. The round-then-sum ordering must hold.
        let input = input_with_items(vec![
            item(dec!(1), dec!(10.004)),
            item(dec!(1), dec!(10.004)),
        ]);
        let quote = build_quote(&input, "00001").unwrap();
        assert_eq!(quote.subtotal, dec!(20.00));
    }

    #[test]
    fn test_empty_item_list_is_rejected() {
        let input = input_with_items(vec![]);
        assert!(matches!(
            build_quote(&input, "00001"),
            Err(QuoteError::EmptyItemList)
        ));
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        let input = input_with_items(vec![item(dec!(0), dec!(10))]);
        assert!(matches!(
            build_quote(&input, "00001"),
            Err(QuoteError::InvalidQuantity { line: 1, .. })
        ));

        let input = input_with_items(vec![
            item(dec!(1), dec!(10)),
            item(dec!(-2), dec!(10)),
        ]);
        assert!(matches!(
            build_quote(&input, "00001"),
            Err(QuoteError::InvalidQuantity { line: 2, .. })
        ));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let input = input_with_items(vec![item(dec!(1), dec!(-5))]);
        assert!(matches!(
            build_quote(&input, "00001"),
            Err(QuoteError::Money(MoneyError::InvalidAmount(_)))
        ));
    }

    #[test]
    fn test_zero_unit_price_allowed() {
        let input = input_with_items(vec![item(dec!(1), dec!(0))]);
        let quote = build_quote(&input, "00001").unwrap();
        assert_eq!(quote.subtotal, dec!(0.00));
        assert_eq!(quote.total, dec!(0.00));
    }

    #[test]
    fn test_defaults_applied() {
        let input = input_with_items(vec![item(dec!(1), dec!(10))]);
        let quote = build_quote(&input, "00001").unwrap();

        assert_eq!(quote.currency, Currency::Pen);
        assert_eq!(quote.items[0].unit_measure, "UND");
        assert_eq!(quote.payment_condition, "CONTADO");
        assert_eq!(quote.validity_days, 4);
        assert_eq!(quote.delivery_time, "ON IMMEDIATE STOCK");
        assert_eq!(quote.warranty, "12 MONTHS");
        assert_eq!(quote.valid_until, quote.document_date + Duration::days(4));
    }

    #[test]
    fn test_blank_fields_fall_back_to_defaults() {
        let mut input = input_with_items(vec![QuoteItemInput {
            code: None,
            description: None,
            unit_measure: Some("   ".to_string()),
            quantity: dec!(1),
            unit_price: dec!(10),
        }]);
        input.payment_condition = Some(String::new());
        input.warranty = Some("  ".to_string());

        let quote = build_quote(&input, "00001").unwrap();
        assert_eq!(quote.items[0].unit_measure, "UND");
        assert_eq!(quote.payment_condition, "CONTADO");
        assert_eq!(quote.warranty, "12 MONTHS");
    }

    #[test]
    fn test_explicit_fields_preserved() {
        let mut input = input_with_items(vec![QuoteItemInput {
            code: Some("V-100".to_string()),
            description: Some("Gate valve".to_string()),
            unit_measure: Some("PZA".to_string()),
            quantity: dec!(2),
            unit_price: dec!(50),
        }]);
        input.currency = Some(Currency::Usd);
        input.document_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        input.valid_until = NaiveDate::from_ymd_opt(2026, 3, 15);
        input.payment_condition = Some("CREDITO 30 DIAS".to_string());
        input.validity_days = Some(15);

        let quote = build_quote(&input, "00099").unwrap();
        assert_eq!(quote.currency, Currency::Usd);
        assert_eq!(quote.items[0].unit_measure, "PZA");
        assert_eq!(quote.document_date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(quote.valid_until, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(quote.payment_condition, "CREDITO 30 DIAS");
        assert_eq!(quote.validity_days, 15);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut input = input_with_items(vec![
            item(dec!(2.5), dec!(13.37)),
            item(dec!(1), dec!(0.005)),
        ]);
        // Pin the dates so the two builds share every input
        input.document_date = NaiveDate::from_ymd_opt(2026, 8, 1);
        input.valid_until = NaiveDate::from_ymd_opt(2026, 8, 5);

        let first = build_quote(&input, "00010").unwrap();
        let second = build_quote(&input, "00010").unwrap();
        assert_eq!(first, second);
    }
}
