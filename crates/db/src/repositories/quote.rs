//! Quote repository: the Postgres-backed quote store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    PaginatorTrait, QueryOrder, Set, SqlErr, Statement,
};
use tracing::error;

use cotiza_core::quote::{NewQuote, QuoteStore, StoreError, StoredQuote};
use cotiza_shared::types::Currency;

use crate::entities::quotes;

/// Only 5-digit numeric document numbers participate in allocation; the
/// cast below is only safe because of this filter.
const MAX_NUMBER_SQL: &str = r"
    SELECT MAX(document_number::integer) AS max_number
    FROM quotes
    WHERE document_number ~ '^[0-9]{5}$'
";

/// Quote repository over a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    db: DatabaseConnection,
}

impl QuoteRepository {
    /// Creates a new quote repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_db_err(e: &DbErr) -> StoreError {
    error!(error = %e, "Database operation failed");
    StoreError::Database(e.to_string())
}

fn to_stored(model: quotes::Model) -> Result<StoredQuote, StoreError> {
    let currency: Currency = model
        .currency
        .parse()
        .map_err(|e: cotiza_shared::types::MoneyError| StoreError::Database(e.to_string()))?;

    Ok(StoredQuote {
        document_number: model.document_number,
        request: model.json_data,
        client_name: model.client_name,
        currency,
        total: model.total,
        item_count: model.item_count,
        first_item_description: model.first_item_description,
        created_at: model.created_at.to_utc(),
        updated_at: model.updated_at.to_utc(),
    })
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    async fn save(&self, quote: NewQuote) -> Result<StoredQuote, StoreError> {
        let now = chrono::Utc::now().into();

        let record = quotes::ActiveModel {
            document_number: Set(quote.document_number.clone()),
            json_data: Set(quote.request),
            client_name: Set(quote.client_name),
            currency: Set(quote.currency.to_string()),
            total: Set(quote.total),
            item_count: Set(quote.item_count),
            first_item_description: Set(quote.first_item_description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match record.insert(&self.db).await {
            Ok(model) => to_stored(model),
            // The primary key arbitrates the allocation race
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StoreError::DuplicateDocumentNumber(quote.document_number))
            }
            Err(e) => Err(map_db_err(&e)),
        }
    }

    async fn find_by_document_number(
        &self,
        document_number: &str,
    ) -> Result<Option<StoredQuote>, StoreError> {
        let model = quotes::Entity::find_by_id(document_number)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err(&e))?;

        model.map(to_stored).transpose()
    }

    async fn exists_by_document_number(&self, document_number: &str) -> Result<bool, StoreError> {
        let count = quotes::Entity::find_by_id(document_number)
            .count(&self.db)
            .await
            .map_err(|e| map_db_err(&e))?;

        Ok(count > 0)
    }

    async fn delete_by_document_number(&self, document_number: &str) -> Result<bool, StoreError> {
        let result = quotes::Entity::delete_by_id(document_number)
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err(&e))?;

        Ok(result.rows_affected > 0)
    }

    async fn list_all_by_created_at_desc(&self) -> Result<Vec<StoredQuote>, StoreError> {
        let models = quotes::Entity::find()
            .order_by_desc(quotes::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err(&e))?;

        models.into_iter().map(to_stored).collect()
    }

    async fn max_numeric_document_number(&self) -> Result<Option<i32>, StoreError> {
        let row = self
            .db
            .query_one(Statement::from_string(DbBackend::Postgres, MAX_NUMBER_SQL))
            .await
            .map_err(|e| map_db_err(&e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get::<Option<i32>>("", "max_number")
            .map_err(|e| map_db_err(&e))
    }
}
