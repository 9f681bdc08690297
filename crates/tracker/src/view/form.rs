//! Form-bound drafts and their validation.
//!
//! Form fields arrive as raw strings and are kept that way in the view state
//! so that a rejected submission re-renders exactly what the user typed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pantry_tracker_core::{DEFAULT_QUANTITY, ItemFields, ItemId, ItemPatch, PantryItem};

use super::messages;

/// Format of `<input type="date">` values.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The "add new item" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub expiration_date: String,
}

impl Default for DraftItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
            expiration_date: String::new(),
        }
    }
}

impl DraftItem {
    /// Validate the draft into the fields to insert.
    ///
    /// Name and expiration date are required; a blank quantity falls back to
    /// the default.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for the first failed check.
    pub fn validate(&self) -> Result<ItemFields, &'static str> {
        let name = self.name.trim();
        let expiration_date = self.expiration_date.trim();
        if name.is_empty() || expiration_date.is_empty() {
            return Err(messages::FILL_ALL_FIELDS);
        }

        let quantity = match self.quantity.trim() {
            "" => DEFAULT_QUANTITY,
            raw => parse_quantity(raw)?,
        };

        Ok(ItemFields {
            name: name.to_string(),
            quantity,
            expiration_date: parse_date(expiration_date)?,
        })
    }
}

/// Scratch copy of the item being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: ItemId,
    pub name: String,
    pub quantity: String,
    pub expiration_date: String,
}

impl SelectedItem {
    /// Copy an item into an editable scratch object.
    #[must_use]
    pub fn from_item(item: &PantryItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            expiration_date: item.expiration_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Take the submitted edit form values into the scratch copy.
    pub fn absorb(&mut self, form: EditForm) {
        self.quantity = form.quantity;
        self.expiration_date = form.expiration_date;
    }

    /// Validate the scratch copy into the patch to write.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for the first failed check.
    pub fn validate(&self) -> Result<ItemPatch, &'static str> {
        let quantity = self.quantity.trim();
        let expiration_date = self.expiration_date.trim();
        if quantity.is_empty() || expiration_date.is_empty() {
            return Err(messages::FILL_ALL_FIELDS);
        }

        Ok(ItemPatch {
            quantity: parse_quantity(quantity)?,
            expiration_date: parse_date(expiration_date)?,
        })
    }
}

/// The edit modal's submitted fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub expiration_date: String,
}

fn parse_quantity(raw: &str) -> Result<u32, &'static str> {
    raw.parse::<u32>().map_err(|_| messages::INVALID_QUANTITY)
}

fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| messages::INVALID_DATE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(name: &str, quantity: &str, date: &str) -> DraftItem {
        DraftItem {
            name: name.to_string(),
            quantity: quantity.to_string(),
            expiration_date: date.to_string(),
        }
    }

    #[test]
    fn test_default_draft_matches_reset_form() {
        let d = DraftItem::default();
        assert_eq!(d.name, "");
        assert_eq!(d.quantity, "1");
        assert_eq!(d.expiration_date, "");
    }

    #[test]
    fn test_draft_requires_name_and_date() {
        assert_eq!(
            draft("", "2", "2024-01-01").validate(),
            Err(messages::FILL_ALL_FIELDS)
        );
        assert_eq!(draft("Milk", "2", "").validate(), Err(messages::FILL_ALL_FIELDS));
        assert_eq!(draft("   ", "2", "2024-01-01").validate(), Err(messages::FILL_ALL_FIELDS));
    }

    #[test]
    fn test_draft_blank_quantity_defaults_to_one() {
        let fields = draft("Milk", " ", "2024-01-01").validate().unwrap();
        assert_eq!(fields.quantity, 1);
    }

    #[test]
    fn test_draft_rejects_bad_quantity_and_date() {
        assert_eq!(
            draft("Milk", "-3", "2024-01-01").validate(),
            Err(messages::INVALID_QUANTITY)
        );
        assert_eq!(
            draft("Milk", "2", "01/01/2024").validate(),
            Err(messages::INVALID_DATE)
        );
    }

    #[test]
    fn test_draft_trims_name() {
        let fields = draft("  Oat milk ", "3", "2024-05-06").validate().unwrap();
        assert_eq!(fields.name, "Oat milk");
        assert_eq!(fields.quantity, 3);
        assert_eq!(
            fields.expiration_date,
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
        );
    }

    #[test]
    fn test_selected_item_copies_and_validates() {
        let item = PantryItem {
            id: ItemId::new("i1"),
            name: "Milk".to_string(),
            quantity: 2,
            expiration_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let mut selected = SelectedItem::from_item(&item);
        assert_eq!(selected.quantity, "2");
        assert_eq!(selected.expiration_date, "2024-01-01");

        selected.absorb(EditForm {
            quantity: String::new(),
            expiration_date: "2024-02-01".to_string(),
        });
        assert_eq!(selected.validate(), Err(messages::FILL_ALL_FIELDS));

        selected.absorb(EditForm {
            quantity: "9".to_string(),
            expiration_date: "2024-02-01".to_string(),
        });
        let patch = selected.validate().unwrap();
        assert_eq!(patch.quantity, 9);
    }
}
