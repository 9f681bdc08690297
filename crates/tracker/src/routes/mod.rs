//! HTTP route handlers for the tracker.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                     - Tracker page (?q= filters by name)
//! POST /refresh              - Re-fetch the item list
//!
//! # Items
//! POST /items                - Add an item
//! POST /items/{id}/edit      - Open the edit modal on an item
//! POST /items/update         - Commit the edit modal
//! POST /items/edit/cancel    - Close the edit modal
//! POST /items/{id}/delete    - Delete an item
//!
//! # Camera
//! POST /camera/open          - Open the capture modal
//! POST /camera/close         - Close the capture modal
//! POST /camera/capture       - Upload a still (multipart)
//! POST /camera/discard       - Drop the captured still
//!
//! # Auth
//! GET  /signin               - Sign-in page
//! POST /signin               - Sign-in action
//! GET  /signup               - Sign-up page
//! POST /signup               - Sign-up action
//! POST /logout               - Logout action
//! ```
//!
//! Every POST runs one view operation, stores the view state in the session
//! and redirects back to `/`.

pub mod auth;
pub mod camera;
pub mod items;
pub mod tracker;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::error::Result;
use crate::identity::AuthUser;
use crate::middleware::auth_rate_limiter;
use crate::models::session_keys;
use crate::state::AppState;
use crate::view::{Outcome, TrackerView};

/// Path of the tracker page.
pub const TRACKER_PATH: &str = "/";

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(items::add))
        .route("/update", post(items::update))
        .route("/edit/cancel", post(items::cancel_edit))
        .route("/{id}/edit", post(items::select))
        .route("/{id}/delete", post(items::delete))
}

/// Create the camera routes router.
///
/// The capture route enforces its own size limit while reading the upload.
pub fn camera_routes() -> Router<AppState> {
    Router::new()
        .route("/open", post(camera::open))
        .route("/close", post(camera::close))
        .route("/discard", post(camera::discard))
        .route(
            "/capture",
            post(camera::capture).layer(DefaultBodyLimit::disable()),
        )
}

/// Create the sign-in and sign-up routes.
///
/// Only the form submissions are rate limited per client IP; they share one
/// quota. The pages stay reachable so the session gate can always land there.
pub fn auth_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();
    Router::new()
        .route(
            "/signin",
            get(auth::sign_in_page).merge(post(auth::sign_in).layer(limiter.clone())),
        )
        .route(
            "/signup",
            get(auth::sign_up_page).merge(post(auth::sign_up).layer(limiter)),
        )
}

/// Create all routes for the tracker.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(TRACKER_PATH, get(tracker::show))
        .route("/refresh", post(tracker::refresh))
        .route("/logout", post(auth::logout))
        .nest("/items", item_routes())
        .nest("/camera", camera_routes())
        .merge(auth_routes())
}

// =============================================================================
// View State Helpers
// =============================================================================

/// Read this browser's view state, or a fresh one.
async fn load_view(session: &Session) -> Result<TrackerView> {
    Ok(session
        .get::<TrackerView>(session_keys::TRACKER_VIEW)
        .await?
        .unwrap_or_default())
}

/// Write this browser's view state back to the session.
async fn save_view(session: &Session, view: &TrackerView) -> Result<()> {
    session.insert(session_keys::TRACKER_VIEW, view).await?;
    Ok(())
}

/// Load the view state and run the session gate for a signed-in user.
async fn active_view(state: &AppState, session: &Session, user: &AuthUser) -> Result<TrackerView> {
    let mut view = load_view(session).await?;
    view.activate(Some(&user.id), state.store()).await;
    Ok(view)
}

/// Finish an action: reconcile if configured, store the view, go back to the
/// tracker page.
async fn finish(
    state: &AppState,
    session: &Session,
    mut view: TrackerView,
    outcome: Outcome,
) -> Result<Redirect> {
    if outcome == Outcome::Applied && state.config().refetch_after_mutation {
        view.load_items(state.store()).await;
    }
    save_view(session, &view).await?;
    Ok(Redirect::to(TRACKER_PATH))
}
