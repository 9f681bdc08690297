//! Identity provider error types.

use thiserror::Error;

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up for an address that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password rejected by the provider's policy.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The provider's session token is no longer valid.
    #[error("session expired")]
    SessionExpired,

    /// Transport failure reaching the provider.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an unexpected status.
    #[error("identity provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's response could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl IdentityError {
    /// Short code carried in the sign-in redirect (`/signin?error=...`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "credentials",
            Self::UserAlreadyExists => "email_taken",
            Self::WeakPassword(_) => "weak_password",
            Self::SessionExpired => "session",
            Self::Http(_) | Self::Api { .. } | Self::InvalidResponse(_) | Self::PasswordHash => {
                "unavailable"
            }
        }
    }
}
