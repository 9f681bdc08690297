//! Session middleware configuration.
//!
//! Sessions are server-side: the cookie carries only an opaque ID. The remote
//! backend keeps them in `PostgreSQL`, the memory backend in process.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::TrackerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pantry_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
///
/// # Arguments
///
/// * `store` - Session store (`PostgresStore` or `MemoryStore`)
/// * `config` - Tracker configuration (for the cookie's `Secure` flag)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &TrackerConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
