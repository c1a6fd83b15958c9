//! Core business logic for Cotiza.
//!
//! This crate owns the quoting engine: the totals builder, the document
//! number allocator, and the orchestration service. It talks to the outside
//! world (database, PDF renderer, SMTP) exclusively through the ports in
//! [`quote::store`] and [`quote::delivery`]; no web or database
//! dependencies live here.

pub mod quote;

pub use quote::builder::build_quote;
pub use quote::error::QuoteError;
pub use quote::service::QuoteService;
