//! `SeaORM` entity definitions.

pub mod quotes;
