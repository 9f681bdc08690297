//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use pantry_tracker_core::{CollectionPath, DocumentId};

use super::{Document, DocumentStore, StoreError, ensure_object, new_document_id};

/// Document store kept in memory; contents are lost when the process exits.
///
/// Each collection is a vector so that `list` returns insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        collection: &CollectionPath,
        data: Value,
    ) -> Result<DocumentId, StoreError> {
        ensure_object(&data)?;
        let id = new_document_id();

        self.collections
            .write()
            .await
            .entry(collection.as_str().to_owned())
            .or_default()
            .push(Document {
                id: id.clone(),
                data,
            });

        Ok(id)
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        partial: Value,
    ) -> Result<(), StoreError> {
        ensure_object(&partial)?;

        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection.as_str())
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            .ok_or(StoreError::NotFound)?;

        if let (Some(target), Value::Object(fields)) = (doc.data.as_object_mut(), partial) {
            target.extend(fields);
        }
        Ok(())
    }

    async fn delete(&self, collection: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.write().await.get_mut(collection.as_str()) {
            docs.retain(|d| &d.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use pantry_tracker_core::UserId;

    use super::*;

    fn path(uid: &str) -> CollectionPath {
        CollectionPath::pantry_items(&UserId::new(uid))
    }

    #[tokio::test]
    async fn test_list_returns_insertion_order() {
        let store = MemoryDocumentStore::new();
        let a = store.insert(&path("u"), json!({"name": "A"})).await.unwrap();
        let b = store.insert(&path("u"), json!({"name": "B"})).await.unwrap();

        let docs = store.list(&path("u")).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        store.insert(&path("alice"), json!({"name": "A"})).await.unwrap();

        assert!(store.list(&path("bob")).await.unwrap().is_empty());
        assert_eq!(store.list(&path("alice")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_top_level_keys() {
        let store = MemoryDocumentStore::new();
        let id = store
            .insert(&path("u"), json!({"name": "Milk", "quantity": 1}))
            .await
            .unwrap();

        store
            .update(&path("u"), &id, json!({"quantity": 3}))
            .await
            .unwrap();

        let docs = store.list(&path("u")).await.unwrap();
        assert_eq!(docs[0].data, json!({"name": "Milk", "quantity": 3}));
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update(&path("u"), &DocumentId::new("nope"), json!({"quantity": 3}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        let id = store.insert(&path("u"), json!({"name": "A"})).await.unwrap();

        store.delete(&path("u"), &id).await.unwrap();
        store.delete(&path("u"), &id).await.unwrap();
        assert!(store.list(&path("u")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let store = MemoryDocumentStore::new();
        let err = store.insert(&path("u"), json!("milk")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }
}
