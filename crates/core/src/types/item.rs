//! Pantry item types.
//!
//! The document body stored for each item uses camelCase keys (`name`,
//! `quantity`, `expirationDate`); the ID is the document's key and is never
//! part of the body.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// Quantity used when the add form leaves the field blank.
pub const DEFAULT_QUANTITY: u32 = 1;

/// The stored fields of a pantry item (the document body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    /// Display name, searched by the name filter.
    pub name: String,
    /// How many units are on the shelf.
    pub quantity: u32,
    /// Calendar date the item expires, serialized as `YYYY-MM-DD`.
    pub expiration_date: NaiveDate,
}

/// The partial update applied when an item is edited.
///
/// Only quantity and expiration date are editable; the name is fixed at
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub quantity: u32,
    pub expiration_date: NaiveDate,
}

/// A pantry item as held in the view's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    /// Store-assigned identifier, unique within the owner's collection.
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub expiration_date: NaiveDate,
}

impl PantryItem {
    /// Build an item from its store ID and document body.
    #[must_use]
    pub fn from_fields(id: ItemId, fields: ItemFields) -> Self {
        Self {
            id,
            name: fields.name,
            quantity: fields.quantity,
            expiration_date: fields.expiration_date,
        }
    }

    /// Apply an edit in place. The name is left untouched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        self.quantity = patch.quantity;
        self.expiration_date = patch.expiration_date;
    }

    /// Whole days from `today` until the item expires (negative once expired).
    #[must_use]
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiration_date - today).num_days()
    }

    /// Whether the item's expiration date is before `today`.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date < today
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_fields_use_camel_case_keys() {
        let fields = ItemFields {
            name: "Milk".to_string(),
            quantity: 2,
            expiration_date: date("2024-01-01"),
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            value,
            json!({"name": "Milk", "quantity": 2, "expirationDate": "2024-01-01"})
        );
    }

    #[test]
    fn test_patch_serializes_only_editable_fields() {
        let patch = ItemPatch {
            quantity: 5,
            expiration_date: date("2025-06-30"),
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"quantity": 5, "expirationDate": "2025-06-30"}));
    }

    #[test]
    fn test_apply_keeps_name() {
        let mut item = PantryItem {
            id: ItemId::new("1"),
            name: "Eggs".to_string(),
            quantity: 12,
            expiration_date: date("2024-03-01"),
        };
        item.apply(&ItemPatch {
            quantity: 6,
            expiration_date: date("2024-03-05"),
        });
        assert_eq!(item.name, "Eggs");
        assert_eq!(item.quantity, 6);
        assert_eq!(item.expiration_date, date("2024-03-05"));
    }

    #[test]
    fn test_expiry_helpers() {
        let item = PantryItem {
            id: ItemId::new("1"),
            name: "Bread".to_string(),
            quantity: 1,
            expiration_date: date("2024-01-10"),
        };
        assert_eq!(item.days_until_expiry(date("2024-01-07")), 3);
        assert!(!item.is_expired(date("2024-01-10")));
        assert!(item.is_expired(date("2024-01-11")));
    }
}
