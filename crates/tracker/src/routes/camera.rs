//! Camera capture handlers.
//!
//! The capture form posts a single still as `multipart/form-data` under the
//! `image` field. It is kept in the view state only.

use axum::{
    extract::{Multipart, State},
    response::Redirect,
};
use tower_sessions::Session;

use super::{active_view, finish};
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::state::AppState;
use crate::view::{CapturedImage, Outcome};

/// Multipart field carrying the still.
const IMAGE_FIELD: &str = "image";

/// Open the capture modal.
pub async fn open(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    view.open_camera();
    finish(&state, &session, view, Outcome::Skipped).await
}

/// Close the capture modal.
pub async fn close(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    view.close_camera();
    finish(&state, &session, view, Outcome::Skipped).await
}

/// Drop the captured still.
pub async fn discard(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    let mut view = active_view(&state, &session, &user).await?;
    view.discard_image();
    finish(&state, &session, view, Outcome::Skipped).await
}

/// Take the uploaded still.
///
/// Rejected uploads are logged and leave the modal open.
pub async fn capture(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let max_bytes = state.config().max_image_bytes;
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let mut bytes = Vec::new();
        // Stop reading one byte past the limit; that is enough to reject it.
        while let Some(chunk) = field.chunk().await? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > max_bytes {
                break;
            }
        }
        upload = Some((content_type, bytes));
        break;
    }

    let mut view = active_view(&state, &session, &user).await?;
    let (content_type, bytes) = upload.unwrap_or_default();
    match CapturedImage::from_upload(content_type.as_deref(), &bytes, max_bytes) {
        Ok(image) => {
            tracing::info!(
                user_id = %user.id,
                content_type = %image.content_type,
                size = bytes.len(),
                "Captured image"
            );
            view.capture(image);
        }
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Rejected captured image");
        }
    }

    finish(&state, &session, view, Outcome::Skipped).await
}
