//! Tracker page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_sessions::Session;

use pantry_tracker_core::PantryItem;

use super::{active_view, finish, load_view, save_view};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::SIGN_IN_PATH;
use crate::middleware::{OptionalUser, RequireUser};
use crate::state::AppState;
use crate::view::{CapturedImage, DraftItem, Gate, Outcome, SelectedItem};

/// Items expiring within this many days are flagged on the page.
const EXPIRING_SOON_DAYS: i64 = 3;

/// Query parameters for the tracker page.
#[derive(Debug, Deserialize)]
pub struct TrackerQuery {
    /// Search term; absent keeps the remembered one, empty clears it.
    pub q: Option<String>,
}

/// How close an item is to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Expired,
    ExpiringSoon,
    Fresh,
}

impl Freshness {
    /// CSS modifier class for the item row.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Expired => "item--expired",
            Self::ExpiringSoon => "item--soon",
            Self::Fresh => "item--fresh",
        }
    }
}

/// One row of the item list.
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub expiration_date: String,
    pub freshness: Freshness,
}

impl ItemRow {
    fn new(item: &PantryItem, today: NaiveDate) -> Self {
        let days_left = item.days_until_expiry(today);
        let freshness = if item.is_expired(today) {
            Freshness::Expired
        } else if days_left <= EXPIRING_SOON_DAYS {
            Freshness::ExpiringSoon
        } else {
            Freshness::Fresh
        };

        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity,
            expiration_date: item.expiration_date.format("%Y-%m-%d").to_string(),
            freshness,
        }
    }
}

/// Tracker page template.
#[derive(Template, WebTemplate)]
#[template(path = "tracker.html")]
pub struct TrackerTemplate {
    pub email: String,
    pub search_term: String,
    pub items: Vec<ItemRow>,
    pub total_items: usize,
    pub draft: DraftItem,
    pub selected: Option<SelectedItem>,
    pub edit_open: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub camera_open: bool,
    pub image: Option<CapturedImage>,
}

/// Display the tracker page.
///
/// Runs the session gate: without a signed-in user the view is reset and the
/// visitor is sent to sign in.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<TrackerQuery>,
) -> Result<Response> {
    let mut view = load_view(&session).await?;

    let gate = view
        .activate(user.as_ref().map(|u| &u.id), state.store())
        .await;
    let Some(user) = user.filter(|_| gate == Gate::Proceed) else {
        save_view(&session, &view).await?;
        return Ok(Redirect::to(SIGN_IN_PATH).into_response());
    };

    if let Some(term) = query.q {
        view.set_search(term);
    }

    let notice = view.take_notice();
    save_view(&session, &view).await?;

    let today = chrono::Local::now().date_naive();
    let items = view
        .visible_items()
        .into_iter()
        .map(|item| ItemRow::new(item, today))
        .collect();

    Ok(TrackerTemplate {
        email: user.email.to_string(),
        search_term: view.search_term,
        items,
        total_items: view.items.len(),
        draft: view.draft,
        selected: view.selected,
        edit_open: view.edit_open,
        error: view.error,
        notice,
        camera_open: view.camera_open,
        image: view.image,
    }
    .into_response())
}

/// Re-fetch the item list from the store.
pub async fn refresh(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    view.load_items(state.store()).await;
    view.discard_image();
    finish(&state, &session, view, Outcome::Skipped).await
}
