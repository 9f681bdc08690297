//! Document store access.
//!
//! Pantry items live in a document store partitioned by collection path
//! (`users/{uid}/pantryItems`). The store knows nothing about pantry items:
//! it keeps JSON object documents keyed by a store-assigned ID, and
//! [`PantryItemRepository`] maps typed items onto it.
//!
//! # Backends
//!
//! - [`PostgresDocumentStore`] - `pantry.document` table, JSONB bodies
//! - [`MemoryDocumentStore`] - in-process map for development and tests
//!
//! # Migrations
//!
//! The `pantry.document` table is created by `crates/tracker/migrations/`:
//! ```bash
//! cargo run -p pantry-tracker-cli -- migrate
//! ```

pub mod memory;
pub mod pantry;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use pantry_tracker_core::{CollectionPath, DocumentId};

pub use memory::MemoryDocumentStore;
pub use pantry::PantryItemRepository;
pub use postgres::PostgresDocumentStore;

/// Errors returned by document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The addressed document does not exist.
    #[error("document not found")]
    NotFound,

    /// Documents and partial updates must be JSON objects.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// A stored document: its ID and JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub data: Value,
}

/// A collection-addressed JSON document store.
///
/// Implementations must keep documents of different collections fully
/// separate and return `list` results in a stable store order (insertion
/// order for both shipped backends).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection`, in store order.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError>;

    /// Insert a new document and return the ID the store assigned to it.
    async fn insert(
        &self,
        collection: &CollectionPath,
        data: Value,
    ) -> Result<DocumentId, StoreError>;

    /// Merge the top-level keys of `partial` into an existing document.
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        partial: Value,
    ) -> Result<(), StoreError>;

    /// Remove a document. Removing a missing document is not an error.
    async fn delete(&self, collection: &CollectionPath, id: &DocumentId) -> Result<(), StoreError>;
}

/// Reject bodies that are not JSON objects.
pub(crate) fn ensure_object(value: &Value) -> Result<(), StoreError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {value}"
        )))
    }
}

/// Generate a document ID (32 lowercase hex characters).
pub(crate) fn new_document_id() -> DocumentId {
    DocumentId::new(uuid::Uuid::new_v4().simple().to_string())
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
