//! Initial migration creating the quotes table.
//!
//! The document number is the primary key: a concurrent insert with the
//! same number fails with a unique violation, which the application layer
//! turns into a retry.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(QUOTES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS quotes CASCADE;")
            .await?;
        Ok(())
    }
}

const QUOTES_SQL: &str = r"
-- Quotes table: raw request plus summary columns for list views
CREATE TABLE quotes (
    document_number VARCHAR(20) PRIMARY KEY,
    json_data JSONB NOT NULL,
    client_name VARCHAR(255),
    currency VARCHAR(3) NOT NULL DEFAULT 'PEN',
    total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    item_count INTEGER NOT NULL DEFAULT 0,
    first_item_description VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Index for the listing endpoint (most recent first)
CREATE INDEX idx_quotes_created ON quotes(created_at DESC);
";
