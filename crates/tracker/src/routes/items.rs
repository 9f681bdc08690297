//! Pantry item action handlers.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;

use pantry_tracker_core::ItemId;

use super::{active_view, finish};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::state::AppState;
use crate::view::{DraftItem, EditForm, Outcome};

/// Add an item from the "add new item" form.
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Form(draft): Form<DraftItem>,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    add_breadcrumb("pantry", "Add item", None);
    let outcome = view.add_item(draft, state.store()).await;
    finish(&state, &session, view, outcome).await
}

/// Open the edit modal on an item.
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    let id = ItemId::new(id);
    if !view.select_item(&id) {
        tracing::debug!(user_id = %user.id, item_id = %id, "Edit requested for unknown item");
    }
    finish(&state, &session, view, Outcome::Skipped).await
}

/// Commit the edit modal.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Form(form): Form<EditForm>,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    add_breadcrumb("pantry", "Edit item", None);
    let outcome = view.update_item(form, state.store()).await;
    finish(&state, &session, view, outcome).await
}

/// Close the edit modal without saving.
pub async fn cancel_edit(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    view.cancel_edit();
    finish(&state, &session, view, Outcome::Skipped).await
}

/// Delete an item.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    add_breadcrumb("pantry", "Delete item", Some(&[("item_id", id.as_str())]));
    let outcome = view.delete_item(&ItemId::new(id), state.store()).await;
    finish(&state, &session, view, outcome).await
}
