//! Common types used across the application.

pub mod money;

pub use money::{Currency, Money, MoneyError, round_half_up};
