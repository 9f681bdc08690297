//! In-process identity provider.
//!
//! Accounts and active tokens live in memory; passwords are stored as
//! Argon2id hashes. Used by the `memory` backend and by tests.

use std::collections::{HashMap, HashSet};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pantry_tracker_core::{Email, UserId};

use super::{AuthUser, IdentityError, IdentityProvider};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

struct Account {
    id: UserId,
    password_hash: String,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    active_tokens: HashSet<String>,
}

/// Identity provider kept in memory.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<Accounts>,
}

impl MemoryIdentityProvider {
    /// Create a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens issued and not yet signed out.
    pub async fn active_sessions(&self) -> usize {
        self.accounts.read().await.active_tokens.len()
    }

    async fn issue(&self, id: UserId, email: &Email) -> AuthUser {
        let token = Uuid::new_v4().to_string();
        self.accounts
            .write()
            .await
            .active_tokens
            .insert(token.clone());
        AuthUser::new(id, email.clone(), token)
    }
}

/// Accounts are keyed case-insensitively by address.
fn account_key(email: &Email) -> String {
    email.as_str().to_lowercase()
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, IdentityError> {
        let (id, hash) = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .by_email
                .get(&account_key(email))
                .ok_or(IdentityError::InvalidCredentials)?;
            (account.id.clone(), account.password_hash.clone())
        };

        verify_password(password, &hash)?;
        Ok(self.issue(id, email).await)
    }

    async fn sign_up(&self, email: &Email, password: &str) -> Result<AuthUser, IdentityError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        let id = UserId::new(Uuid::new_v4().simple().to_string());

        {
            let mut accounts = self.accounts.write().await;
            let key = account_key(email);
            if accounts.by_email.contains_key(&key) {
                return Err(IdentityError::UserAlreadyExists);
            }
            accounts.by_email.insert(
                key,
                Account {
                    id: id.clone(),
                    password_hash,
                },
            );
        }

        tracing::info!(user_id = %id, "Account created");
        Ok(self.issue(id, email).await)
    }

    async fn sign_out(&self, user: &AuthUser) -> Result<(), IdentityError> {
        let removed = self
            .accounts
            .write()
            .await
            .active_tokens
            .remove(user.access_token());
        if removed {
            Ok(())
        } else {
            Err(IdentityError::SessionExpired)
        }
    }
}

fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(IdentityError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| IdentityError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), IdentityError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| IdentityError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_yields_same_user() {
        let provider = MemoryIdentityProvider::new();
        let created = provider
            .sign_up(&email("cook@example.com"), "correct horse")
            .await
            .unwrap();
        let signed_in = provider
            .sign_in(&email("COOK@example.com"), "correct horse")
            .await
            .unwrap();

        assert_eq!(created.id, signed_in.id);
        assert_ne!(created.access_token(), signed_in.access_token());
        assert_eq!(provider.active_sessions().await, 2);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider
            .sign_up(&email("cook@example.com"), "correct horse")
            .await
            .unwrap();

        let err = provider
            .sign_in(&email("cook@example.com"), "battery staple")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_account_rejected() {
        let provider = MemoryIdentityProvider::new();
        let err = provider
            .sign_in(&email("ghost@example.com"), "whatever1")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_and_weak_sign_ups() {
        let provider = MemoryIdentityProvider::new();
        provider
            .sign_up(&email("cook@example.com"), "correct horse")
            .await
            .unwrap();

        assert!(matches!(
            provider
                .sign_up(&email("cook@example.com"), "another one")
                .await
                .unwrap_err(),
            IdentityError::UserAlreadyExists
        ));
        assert!(matches!(
            provider
                .sign_up(&email("new@example.com"), "short")
                .await
                .unwrap_err(),
            IdentityError::WeakPassword(_)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token_once() {
        let provider = MemoryIdentityProvider::new();
        let user = provider
            .sign_up(&email("cook@example.com"), "correct horse")
            .await
            .unwrap();

        provider.sign_out(&user).await.unwrap();
        assert_eq!(provider.active_sessions().await, 0);
        assert!(matches!(
            provider.sign_out(&user).await.unwrap_err(),
            IdentityError::SessionExpired
        ));
    }
}
