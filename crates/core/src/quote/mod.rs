//! Quote domain: pricing, numbering, and orchestration.
//!
//! A quote is priced transiently for every generate/preview/email request
//! from its raw request data; it becomes durable only when explicitly
//! saved. Stored totals are summary columns, never the source of truth.

pub mod builder;
pub mod delivery;
pub mod error;
pub mod number;
pub mod service;
pub mod store;
pub mod types;

pub use builder::build_quote;
pub use delivery::{MailError, QuoteMailer, QuoteRenderer, RenderError};
pub use error::QuoteError;
pub use number::DocumentNumberAllocator;
pub use service::{GeneratedQuote, QuoteService};
pub use store::{QuoteStore, StoreError};
pub use types::{CreateQuoteInput, NewQuote, Quote, QuoteItem, QuoteItemInput, StoredQuote};
