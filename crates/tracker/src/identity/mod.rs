//! Identity provider integration.
//!
//! Authentication is delegated entirely to an identity provider. The tracker
//! only signs users in and out through it and keeps the resulting
//! [`AuthUser`] in the session.
//!
//! # Providers
//!
//! - [`HttpIdentityProvider`] - GoTrue-compatible REST API
//! - [`MemoryIdentityProvider`] - in-process accounts for development and tests

mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pantry_tracker_core::{Email, UserId};

pub use error::IdentityError;
pub use http::HttpIdentityProvider;
pub use memory::MemoryIdentityProvider;

/// The signed-in user as reported by the identity provider.
///
/// Stored in the session. Implements `Debug` manually to redact the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-assigned user ID; names the user's item namespace.
    pub id: UserId,
    /// Address the user signed in with.
    pub email: Email,
    access_token: String,
}

impl AuthUser {
    /// Create a signed-in user.
    #[must_use]
    pub fn new(id: UserId, email: Email, access_token: impl Into<String>) -> Self {
        Self {
            id,
            email,
            access_token: access_token.into(),
        }
    }

    /// Provider token used to end the provider-side session.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// An external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with email and password.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, IdentityError>;

    /// Register a new account and sign it in.
    async fn sign_up(&self, email: &Email, password: &str) -> Result<AuthUser, IdentityError>;

    /// End the provider-side session for `user`.
    async fn sign_out(&self, user: &AuthUser) -> Result<(), IdentityError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_debug_redacts_token() {
        let user = AuthUser::new(
            UserId::new("u1"),
            Email::parse("cook@example.com").unwrap(),
            "very-private-token",
        );
        let debug_output = format!("{user:?}");
        assert!(debug_output.contains("cook@example.com"));
        assert!(!debug_output.contains("very-private-token"));
    }

    #[test]
    fn test_auth_user_survives_session_serialization() {
        let user = AuthUser::new(
            UserId::new("u1"),
            Email::parse("cook@example.com").unwrap(),
            "tok",
        );
        let json = serde_json::to_string(&user).unwrap();
        let back: AuthUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
        assert_eq!(back.access_token(), "tok");
    }
}
