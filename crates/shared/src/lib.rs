//! Shared types, errors, and configuration for Cotiza.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision and currency tagging
//! - Application configuration
//! - Email delivery service

pub mod config;
pub mod email;
pub mod types;

pub use config::AppConfig;
pub use email::{EmailError, EmailService};
pub use types::{Currency, Money, MoneyError};
