//! `PostgreSQL` document store.
//!
//! Documents live in `pantry.document`, one row per document, with the body in
//! a JSONB column. Store order is the `seq` column (insertion order).

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use pantry_tracker_core::{CollectionPath, DocumentId};

use super::{Document, DocumentStore, StoreError, ensure_object, new_document_id};

/// Internal row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: DocumentId::new(row.id),
            data: row.data.0,
        }
    }
}

/// Document store backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data
            FROM pantry.document
            WHERE collection = $1
            ORDER BY seq
            ",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn insert(
        &self,
        collection: &CollectionPath,
        data: Value,
    ) -> Result<DocumentId, StoreError> {
        ensure_object(&data)?;
        let id = new_document_id();

        sqlx::query::<sqlx::Postgres>(
            r"
            INSERT INTO pantry.document (collection, id, data)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        partial: Value,
    ) -> Result<(), StoreError> {
        ensure_object(&partial)?;

        let result = sqlx::query::<sqlx::Postgres>(
            r"
            UPDATE pantry.document
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(partial))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, collection: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM pantry.document
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
