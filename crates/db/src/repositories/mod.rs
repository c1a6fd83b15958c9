//! Repository abstractions for data access.

mod quote;

pub use quote::QuoteRepository;
