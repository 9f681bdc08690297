//! Sign-in, sign-up and logout handlers.
//!
//! Authentication itself is delegated to the identity provider; these
//! handlers only move the resulting [`AuthUser`] in and out of the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use pantry_tracker_core::Email;

use super::{TRACKER_PATH, active_view, finish};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::identity::{AuthUser, IdentityError};
use crate::middleware::auth::SIGN_IN_PATH;
use crate::middleware::{OptionalUser, RequireUser, clear_current_user, set_current_user};
use crate::models::session_keys;
use crate::state::AppState;
use crate::view::{LogoutOutcome, Outcome, TrackerView};

const SIGN_UP_PATH: &str = "/signup";

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form data.
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signin.html")]
pub struct SignInTemplate {
    pub error: Option<&'static str>,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignUpTemplate {
    pub error: Option<&'static str>,
}

/// Message shown for an `?error=` code.
#[must_use]
pub fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "email" => "Please enter a valid email address.",
        "email_taken" => "An account with this email already exists.",
        "weak_password" => "Password must be at least 8 characters.",
        "password_mismatch" => "Passwords do not match.",
        "session" => "Your session has expired. Please sign in again.",
        _ => "Something went wrong. Please try again.",
    }
}

fn redirect_with_error(path: &str, code: &str) -> Response {
    Redirect::to(&format!("{path}?error={code}")).into_response()
}

/// Put a freshly signed-in user into the session.
async fn start_session(session: &Session, user: &AuthUser) -> Result<Response> {
    set_current_user(session, user).await?;
    session.remove::<TrackerView>(session_keys::TRACKER_VIEW).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Redirect::to(TRACKER_PATH).into_response())
}

// =============================================================================
// Sign-in Routes
// =============================================================================

/// Display the sign-in page; signed-in visitors go straight to the tracker.
pub async fn sign_in_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(TRACKER_PATH).into_response();
    }
    SignInTemplate {
        error: query.error.as_deref().map(error_message),
    }
    .into_response()
}

/// Handle sign-in form submission.
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(redirect_with_error(SIGN_IN_PATH, "email"));
    };

    match state.identity().sign_in(&email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Signed in");
            start_session(&session, &user).await
        }
        Err(e) => {
            log_identity_failure("Sign-in failed", &e);
            Ok(redirect_with_error(SIGN_IN_PATH, e.code()))
        }
    }
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Display the sign-up page.
pub async fn sign_up_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(TRACKER_PATH).into_response();
    }
    SignUpTemplate {
        error: query.error.as_deref().map(error_message),
    }
    .into_response()
}

/// Handle sign-up form submission.
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> Result<Response> {
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(redirect_with_error(SIGN_UP_PATH, "email"));
    };
    if form.password != form.password_confirm {
        return Ok(redirect_with_error(SIGN_UP_PATH, "password_mismatch"));
    }

    match state.identity().sign_up(&email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Signed up");
            start_session(&session, &user).await
        }
        Err(e) => {
            log_identity_failure("Sign-up failed", &e);
            Ok(redirect_with_error(SIGN_UP_PATH, e.code()))
        }
    }
}

fn log_identity_failure(message: &str, error: &IdentityError) {
    match error {
        IdentityError::Http(_) | IdentityError::Api { .. } | IdentityError::InvalidResponse(_) => {
            tracing::error!(error = %error, "{message}");
        }
        _ => tracing::warn!(error = %error, "{message}"),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// On success the session is cleared and the visitor is sent to sign in. On
/// failure the user stays on the tracker page.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Response> {
    let mut view = active_view(&state, &session, &user).await?;

    match view.logout(&user, state.identity()).await {
        LogoutOutcome::SignedOut => {
            clear_current_user(&session).await?;
            clear_sentry_user();
            Ok(Redirect::to(SIGN_IN_PATH).into_response())
        }
        LogoutOutcome::Failed => Ok(finish(&state, &session, view, Outcome::Skipped)
            .await?
            .into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_identity_code_has_a_specific_message() {
        let generic = error_message("unknown");
        for code in ["credentials", "email_taken", "weak_password", "session"] {
            assert_ne!(error_message(code), generic, "code {code}");
        }
        assert_eq!(error_message("unavailable"), generic);
    }

    #[test]
    fn test_sign_in_template_shows_error() {
        let html = SignInTemplate {
            error: Some(error_message("credentials")),
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains("Invalid email or password."));
        assert!(html.contains("action=\"/signin\""));
    }
}
