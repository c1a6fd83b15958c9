//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for exact arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// IGV (Peruvian VAT) rate: fixed 18%.
pub const IGV_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Errors raised by `Money` construction and arithmetic.
///
/// These are always fatal to the current operation: they indicate a caller
/// bug or bad input and are never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Amount is negative.
    #[error("Amount cannot be negative: {0}")]
    InvalidAmount(Decimal),

    /// Currency code is not one of the supported currencies.
    #[error("Unknown currency: {0}")]
    InvalidCurrency(String),

    /// Arithmetic between two different currencies.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left-hand operand.
        left: Currency,
        /// Currency of the right-hand operand.
        right: Currency,
    },

    /// Subtraction would produce a negative amount.
    #[error("Result cannot be negative: {minuend} - {subtrahend}")]
    NegativeResult {
        /// Amount being subtracted from.
        minuend: Decimal,
        /// Amount being subtracted.
        subtrahend: Decimal,
    },
}

/// Currencies supported by the quoting system.
///
/// A closed enumeration: invalid-currency states are unrepresentable by
/// construction. Parsing from the wire goes through `FromStr`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Peruvian Sol.
    #[default]
    Pen,
    /// US Dollar.
    Usd,
}

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
/// Amounts are never negative; arithmetic requires matching currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount, always >= 0.
    pub amount: Decimal,
    /// The currency the amount is denominated in.
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money instance.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if `amount` is negative.
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() {
            return Err(MoneyError::InvalidAmount(amount));
        }
        Ok(Self { amount, currency })
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Creates an amount in Peruvian soles.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if `amount` is negative.
    pub fn soles(amount: Decimal) -> Result<Self, MoneyError> {
        Self::new(amount, Currency::Pen)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Adds two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if the currencies differ.
    pub fn add(&self, other: &Self) -> Result<Self, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Subtracts another amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if the currencies differ, or
    /// `MoneyError::NegativeResult` if the difference would be negative.
    pub fn subtract(&self, other: &Self) -> Result<Self, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        let result = self.amount - other.amount;
        if result.is_sign_negative() {
            return Err(MoneyError::NegativeResult {
                minuend: self.amount,
                subtrahend: other.amount,
            });
        }
        Ok(Self {
            amount: result,
            currency: self.currency,
        })
    }

    /// Applies the 18% IGV rate and returns the tax amount.
    ///
    /// The result is NOT rounded: rounding happens at the point of display
    /// or aggregation, which is the caller's responsibility.
    #[must_use]
    pub fn apply_igv(&self) -> Self {
        Self {
            amount: self.amount * IGV_RATE,
            currency: self.currency,
        }
    }

    /// Returns this amount rounded to 2 decimal places, half-up.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            amount: round_half_up(self.amount),
            currency: self.currency,
        }
    }
}

/// Rounds a decimal to 2 places using half-up rounding.
///
/// Half-up ("midpoint away from zero") is the rounding mode the quoting
/// domain requires for line subtotals and aggregate tax.
#[must_use]
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pen => write!(f, "PEN"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PEN" => Ok(Self::Pen),
            "USD" => Ok(Self::Usd),
            _ => Err(MoneyError::InvalidCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let money = Money::new(dec!(100.00), Currency::Pen).unwrap();
        assert_eq!(money.amount, dec!(100.00));
        assert_eq!(money.currency, Currency::Pen);
    }

    #[test]
    fn test_money_rejects_negative_amount() {
        let result = Money::new(dec!(-1), Currency::Pen);
        assert_eq!(result, Err(MoneyError::InvalidAmount(dec!(-1))));
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Usd);
        assert!(money.is_zero());
        assert_eq!(money.currency, Currency::Usd);
    }

    #[test]
    fn test_money_add_same_currency() {
        let a = Money::soles(dec!(10)).unwrap();
        let b = Money::soles(dec!(5.50)).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.amount, dec!(15.50));
        assert_eq!(sum.currency, Currency::Pen);
    }

    #[test]
    fn test_money_add_currency_mismatch() {
        let a = Money::new(dec!(10), Currency::Pen).unwrap();
        let b = Money::new(dec!(5), Currency::Usd).unwrap();
        assert_eq!(
            a.add(&b),
            Err(MoneyError::CurrencyMismatch {
                left: Currency::Pen,
                right: Currency::Usd,
            })
        );
    }

    #[test]
    fn test_money_subtract() {
        let a = Money::soles(dec!(15)).unwrap();
        let b = Money::soles(dec!(10)).unwrap();
        assert_eq!(a.subtract(&b).unwrap().amount, dec!(5));
    }

    #[test]
    fn test_money_subtract_negative_result() {
        let a = Money::soles(dec!(10)).unwrap();
        let b = Money::soles(dec!(15)).unwrap();
        assert_eq!(
            a.subtract(&b),
            Err(MoneyError::NegativeResult {
                minuend: dec!(10),
                subtrahend: dec!(15),
            })
        );
    }

    #[test]
    fn test_money_subtract_currency_mismatch() {
        let a = Money::new(dec!(10), Currency::Pen).unwrap();
        let b = Money::new(dec!(5), Currency::Usd).unwrap();
        assert!(matches!(
            a.subtract(&b),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_apply_igv_is_not_rounded() {
        // 25.01 * 0.18 = 4.5018 exactly; rounding is the caller's job
        let subtotal = Money::soles(dec!(25.01)).unwrap();
        let igv = subtotal.apply_igv();
        assert_eq!(igv.amount, dec!(4.5018));
        assert_eq!(igv.currency, Currency::Pen);
    }

    #[test]
    fn test_igv_rate_constant() {
        assert_eq!(IGV_RATE, dec!(0.18));
    }

    #[test]
    fn test_round_half_up_on_half_cent() {
        assert_eq!(round_half_up(dec!(5.005)), dec!(5.01));
        assert_eq!(round_half_up(dec!(5.004)), dec!(5.00));
        assert_eq!(round_half_up(dec!(4.5018)), dec!(4.50));
        assert_eq!(round_half_up(dec!(2.675)), dec!(2.68));
    }

    #[test]
    fn test_rounded() {
        let money = Money::soles(dec!(4.5018)).unwrap();
        assert_eq!(money.rounded().amount, dec!(4.50));
    }

    #[test]
    fn test_repeated_addition_has_no_drift() {
        // 0.1 added ten times must be exactly 1, never 0.9999...
        let tenth = Money::soles(dec!(0.1)).unwrap();
        let mut total = Money::zero(Currency::Pen);
        for _ in 0..10 {
            total = total.add(&tenth).unwrap();
        }
        assert_eq!(total.amount, dec!(1.0));
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Pen.to_string(), "PEN");
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("PEN").unwrap(), Currency::Pen);
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(
            Currency::from_str("EUR"),
            Err(MoneyError::InvalidCurrency("EUR".to_string()))
        );
    }

    #[test]
    fn test_currency_default_is_pen() {
        assert_eq!(Currency::default(), Currency::Pen);
    }
}
