//! Pantry item repository.
//!
//! Maps typed pantry items onto a user's `users/{uid}/pantryItems` collection.

use pantry_tracker_core::{
    CollectionPath, DocumentId, ItemFields, ItemId, ItemPatch, PantryItem, UserId,
};

use super::{DocumentStore, StoreError};

/// Repository for one user's pantry items.
pub struct PantryItemRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: CollectionPath,
}

impl<'a> PantryItemRepository<'a> {
    /// Create a repository scoped to `user`'s namespace.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, user: &UserId) -> Self {
        Self {
            store,
            collection: CollectionPath::pantry_items(user),
        }
    }

    /// Collection this repository reads and writes.
    #[must_use]
    pub const fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Fetch every item in store order.
    ///
    /// Documents whose body does not decode as an item are skipped with a
    /// warning so that one bad document does not hide the whole pantry.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<PantryItem>, StoreError> {
        let docs = self.store.list(&self.collection).await?;

        let items = docs
            .into_iter()
            .filter_map(
                |doc| match serde_json::from_value::<ItemFields>(doc.data) {
                    Ok(fields) => Some(PantryItem::from_fields(doc.id.into(), fields)),
                    Err(e) => {
                        tracing::warn!(
                            collection = %self.collection,
                            document_id = %doc.id,
                            error = %e,
                            "Skipping undecodable pantry item"
                        );
                        None
                    }
                },
            )
            .collect();

        Ok(items)
    }

    /// Insert a new item and return it with its store-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the insert fails.
    pub async fn insert(&self, fields: ItemFields) -> Result<PantryItem, StoreError> {
        let data = serde_json::to_value(&fields)?;
        let id = self.store.insert(&self.collection, data).await?;
        Ok(PantryItem::from_fields(id.into(), fields))
    }

    /// Write an edit (quantity and expiration date only).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the item no longer exists.
    pub async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), StoreError> {
        let partial = serde_json::to_value(patch)?;
        self.store
            .update(&self.collection, &DocumentId::from(id.clone()), partial)
            .await
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete fails.
    pub async fn delete(&self, id: &ItemId) -> Result<(), StoreError> {
        self.store
            .delete(&self.collection, &DocumentId::from(id.clone()))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::store::MemoryDocumentStore;

    fn fields(name: &str, quantity: u32) -> ItemFields {
        ItemFields {
            name: name.to_string(),
            quantity,
            expiration_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_round_trips_fields() {
        let store = MemoryDocumentStore::new();
        let repo = PantryItemRepository::new(&store, &UserId::new("u1"));

        let inserted = repo.insert(fields("Milk", 2)).await.unwrap();
        let listed = repo.list().await.unwrap();

        assert_eq!(listed, vec![inserted]);
    }

    #[tokio::test]
    async fn test_update_touches_only_editable_fields() {
        let store = MemoryDocumentStore::new();
        let repo = PantryItemRepository::new(&store, &UserId::new("u1"));
        let item = repo.insert(fields("Milk", 2)).await.unwrap();

        let new_date = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        repo.update(
            &item.id,
            &ItemPatch {
                quantity: 7,
                expiration_date: new_date,
            },
        )
        .await
        .unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].name, "Milk");
        assert_eq!(listed[0].quantity, 7);
        assert_eq!(listed[0].expiration_date, new_date);
    }

    #[tokio::test]
    async fn test_list_skips_undecodable_documents() {
        let store = MemoryDocumentStore::new();
        let user = UserId::new("u1");
        let repo = PantryItemRepository::new(&store, &user);
        repo.insert(fields("Rice", 1)).await.unwrap();
        store
            .insert(repo.collection(), json!({"name": "Broken", "quantity": "lots"}))
            .await
            .unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Rice");
    }

    #[tokio::test]
    async fn test_users_do_not_see_each_other() {
        let store = MemoryDocumentStore::new();
        PantryItemRepository::new(&store, &UserId::new("alice"))
            .insert(fields("Tea", 1))
            .await
            .unwrap();

        let bob = PantryItemRepository::new(&store, &UserId::new("bob"));
        assert!(bob.list().await.unwrap().is_empty());
    }
}
