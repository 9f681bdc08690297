//! Tracker view state.
//!
//! [`TrackerView`] is everything the tracker page shows for one browser: the
//! signed-in user, the last fetched item snapshot, the search term, form
//! drafts, modal toggles and the current messages. It is serialized into the
//! session between requests.
//!
//! Every user action maps onto one method here. Methods talk to the document
//! store through [`PantryItemRepository`] and update the snapshot
//! optimistically; store and identity failures are turned into messages and
//! log lines, never into errors for the HTTP layer.

pub mod camera;
pub mod form;

use serde::{Deserialize, Serialize};

use pantry_tracker_core::{ItemId, PantryItem, UserId, filter_by_name};

use crate::identity::{AuthUser, IdentityError, IdentityProvider};
use crate::store::{DocumentStore, PantryItemRepository};

pub use camera::{CaptureError, CapturedImage};
pub use form::{DraftItem, EditForm, SelectedItem};

/// User-facing messages.
pub mod messages {
    pub const FILL_ALL_FIELDS: &str = "Please fill out all fields.";
    pub const INVALID_QUANTITY: &str = "Please enter a whole number for the quantity.";
    pub const INVALID_DATE: &str = "Please enter a valid expiration date.";
    pub const ADD_FAILED: &str = "Error adding new item. Please try again.";
    pub const UPDATE_FAILED: &str = "Error updating item. Please try again.";
    pub const DELETE_FAILED: &str = "Error deleting item. Please try again.";
    pub const ITEM_ADDED: &str = "Item added successfully!";
    pub const ITEM_EDITED: &str = "Item edited successfully!";
    pub const ITEM_DELETED: &str = "Item deleted successfully!";
}

/// Loading state of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Identity has not been observed yet.
    #[default]
    Loading,
    /// A user is present and the snapshot has been requested.
    Ready,
    /// No user was present; the visitor was sent to sign in.
    Redirected,
}

/// Result of observing identity on activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Render the tracker.
    Proceed,
    /// Send the visitor to the sign-in page.
    SignIn,
}

/// Result of a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store accepted the change and the snapshot was updated.
    Applied,
    /// Input failed validation; nothing was sent to the store.
    Rejected,
    /// The store call failed; an error message is set.
    Failed,
    /// Nothing to act on (no user, or no item selected).
    Skipped,
}

/// Result of signing out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The provider session is gone; the browser session should be cleared.
    SignedOut,
    /// Sign-out failed; the user stays on the tracker.
    Failed,
}

/// Per-browser state of the tracker page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerView {
    pub phase: Phase,
    pub user: Option<UserId>,
    pub items: Vec<PantryItem>,
    pub search_term: String,
    pub draft: DraftItem,
    pub selected: Option<SelectedItem>,
    pub edit_open: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub camera_open: bool,
    pub image: Option<CapturedImage>,
}

impl TrackerView {
    /// Observe the current identity.
    ///
    /// With no user the view is reset and the caller must redirect to sign
    /// in; the store is not touched. With a user the snapshot is fetched
    /// unless it was already loaded for that same user. A different user
    /// starts from a fresh view.
    pub async fn activate(&mut self, user: Option<&UserId>, store: &dyn DocumentStore) -> Gate {
        let Some(user) = user else {
            *self = Self {
                phase: Phase::Redirected,
                ..Self::default()
            };
            return Gate::SignIn;
        };

        if self.user.as_ref() != Some(user) {
            *self = Self {
                user: Some(user.clone()),
                ..Self::default()
            };
        }

        if self.phase != Phase::Ready {
            self.load_items(store).await;
            self.phase = Phase::Ready;
        }

        Gate::Proceed
    }

    /// Replace the snapshot with the user's collection.
    ///
    /// A failed fetch is logged and leaves the previous snapshot in place.
    pub async fn load_items(&mut self, store: &dyn DocumentStore) {
        let Some(user) = &self.user else {
            return;
        };

        match PantryItemRepository::new(store, user).list().await {
            Ok(items) => {
                tracing::debug!(user_id = %user, count = items.len(), "Loaded pantry items");
                self.items = items;
            }
            Err(e) => {
                tracing::error!(user_id = %user, error = %e, "Failed to fetch pantry items");
            }
        }
    }

    /// Items matching the current search term, in snapshot order.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&PantryItem> {
        filter_by_name(&self.items, &self.search_term)
    }

    /// Remember the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Add an item from the submitted draft.
    pub async fn add_item(&mut self, draft: DraftItem, store: &dyn DocumentStore) -> Outcome {
        let Some(user) = self.user.clone() else {
            return Outcome::Skipped;
        };

        let fields = match draft.validate() {
            Ok(fields) => fields,
            Err(message) => {
                self.draft = draft;
                self.error = Some(message.to_string());
                return Outcome::Rejected;
            }
        };

        match PantryItemRepository::new(store, &user).insert(fields).await {
            Ok(item) => {
                tracing::info!(user_id = %user, item_id = %item.id, "Pantry item added");
                self.items.push(item);
                self.draft = DraftItem::default();
                self.error = None;
                self.notice = Some(messages::ITEM_ADDED.to_string());
                Outcome::Applied
            }
            Err(e) => {
                tracing::error!(user_id = %user, error = %e, "Failed to add pantry item");
                self.draft = draft;
                self.error = Some(messages::ADD_FAILED.to_string());
                Outcome::Failed
            }
        }
    }

    /// Open the edit modal on an item from the snapshot.
    ///
    /// Returns `false` if the item is not in the snapshot.
    pub fn select_item(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.items.iter().find(|item| &item.id == id) else {
            return false;
        };
        self.selected = Some(SelectedItem::from_item(item));
        self.edit_open = true;
        true
    }

    /// Close the edit modal without writing anything.
    pub fn cancel_edit(&mut self) {
        self.selected = None;
        self.edit_open = false;
    }

    /// Commit the edit modal.
    ///
    /// Validation failures keep the modal open. After a store call the modal
    /// closes whether or not the call succeeded.
    pub async fn update_item(&mut self, form: EditForm, store: &dyn DocumentStore) -> Outcome {
        let (Some(user), Some(selected)) = (self.user.clone(), self.selected.as_mut()) else {
            return Outcome::Skipped;
        };

        selected.absorb(form);
        let patch = match selected.validate() {
            Ok(patch) => patch,
            Err(message) => {
                self.error = Some(message.to_string());
                return Outcome::Rejected;
            }
        };
        let id = selected.id.clone();

        let result = PantryItemRepository::new(store, &user)
            .update(&id, &patch)
            .await;
        self.edit_open = false;
        self.selected = None;

        match result {
            Ok(()) => {
                tracing::info!(user_id = %user, item_id = %id, "Pantry item edited");
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.apply(&patch);
                }
                self.error = None;
                self.notice = Some(messages::ITEM_EDITED.to_string());
                Outcome::Applied
            }
            Err(e) => {
                tracing::error!(user_id = %user, item_id = %id, error = %e, "Failed to edit pantry item");
                self.error = Some(messages::UPDATE_FAILED.to_string());
                Outcome::Failed
            }
        }
    }

    /// Delete an item.
    pub async fn delete_item(&mut self, id: &ItemId, store: &dyn DocumentStore) -> Outcome {
        let Some(user) = self.user.clone() else {
            return Outcome::Skipped;
        };

        match PantryItemRepository::new(store, &user).delete(id).await {
            Ok(()) => {
                tracing::info!(user_id = %user, item_id = %id, "Pantry item deleted");
                self.items.retain(|item| &item.id != id);
                self.notice = Some(messages::ITEM_DELETED.to_string());
                Outcome::Applied
            }
            Err(e) => {
                tracing::error!(user_id = %user, item_id = %id, error = %e, "Failed to delete pantry item");
                self.error = Some(messages::DELETE_FAILED.to_string());
                Outcome::Failed
            }
        }
    }

    /// End the provider session for `user`.
    ///
    /// A provider that reports the session as already expired counts as a
    /// successful sign-out.
    pub async fn logout(
        &mut self,
        user: &AuthUser,
        identity: &dyn IdentityProvider,
    ) -> LogoutOutcome {
        match identity.sign_out(user).await {
            Ok(()) | Err(IdentityError::SessionExpired) => {
                tracing::info!(user_id = %user.id, "Signed out");
                *self = Self::default();
                LogoutOutcome::SignedOut
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Error signing out");
                LogoutOutcome::Failed
            }
        }
    }

    pub fn open_camera(&mut self) {
        self.camera_open = true;
    }

    pub fn close_camera(&mut self) {
        self.camera_open = false;
    }

    /// Keep a captured still and close the camera modal.
    pub fn capture(&mut self, image: CapturedImage) {
        self.image = Some(image);
        self.camera_open = false;
    }

    /// Drop the captured still.
    pub fn discard_image(&mut self) {
        self.image = None;
    }

    /// Take the one-shot confirmation message, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
