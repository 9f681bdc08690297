//! GoTrue-compatible identity provider client.
//!
//! # Endpoints
//!
//! ```text
//! POST {base}/token?grant_type=password  - Sign in, returns a session
//! POST {base}/signup                     - Register, returns a session
//! POST {base}/logout                     - Revoke the bearer token
//! ```
//!
//! Every request carries the configured key in the `apikey` header.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use pantry_tracker_core::{Email, UserId};

use super::{AuthUser, IdentityError, IdentityProvider};
use crate::config::IdentityConfig;

/// Request body for sign-in and sign-up.
#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Session returned by sign-in and (auto-confirmed) sign-up.
#[derive(Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: Option<UserResponse>,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

/// Error body; GoTrue has used several shapes over time.
#[derive(Deserialize, Default)]
struct ErrorResponse {
    error: Option<String>,
    error_code: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorResponse {
    fn code(&self) -> &str {
        self.error_code
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("")
    }

    fn text(&self) -> String {
        self.msg
            .as_deref()
            .or(self.error_description.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

/// Identity provider reached over HTTP.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpIdentityProvider {
    /// Create a client for the provider described by `config`.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, config: &IdentityConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn password_request(
        &self,
        path: &str,
        email: &Email,
        password: &str,
    ) -> Result<Response, IdentityError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("apikey", self.api_key.expose_secret())
            .json(&PasswordCredentials {
                email: email.as_str(),
                password,
            })
            .send()
            .await?;
        Ok(response)
    }
}

/// Turn a successful session response into an [`AuthUser`].
async fn read_session(response: Response, email: &Email) -> Result<AuthUser, IdentityError> {
    let session: SessionResponse = response
        .json()
        .await
        .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

    let (Some(token), Some(user)) = (session.access_token, session.user) else {
        // The provider created the account but wants the address confirmed first.
        return Err(IdentityError::InvalidResponse(
            "provider returned no session (email confirmation required?)".to_string(),
        ));
    };

    let email = match user.email.as_deref().map(Email::parse) {
        Some(Ok(reported)) => reported,
        _ => email.clone(),
    };

    Ok(AuthUser::new(UserId::new(user.id), email, token))
}

/// Read an error body without failing on unexpected shapes.
async fn read_error(response: Response) -> (StatusCode, ErrorResponse) {
    let status = response.status();
    let body = response.json::<ErrorResponse>().await.unwrap_or_default();
    (status, body)
}

fn api_error(status: StatusCode, body: &ErrorResponse) -> IdentityError {
    IdentityError::Api {
        status: status.as_u16(),
        message: body.text(),
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, IdentityError> {
        let response = self
            .password_request("token?grant_type=password", email, password)
            .await?;

        if response.status().is_success() {
            return read_session(response, email).await;
        }

        let (status, body) = read_error(response).await;
        tracing::debug!(status = %status, code = body.code(), "Sign-in rejected");
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::InvalidCredentials)
            }
            _ => Err(api_error(status, &body)),
        }
    }

    async fn sign_up(&self, email: &Email, password: &str) -> Result<AuthUser, IdentityError> {
        let response = self.password_request("signup", email, password).await?;

        if response.status().is_success() {
            return read_session(response, email).await;
        }

        let (status, body) = read_error(response).await;
        tracing::debug!(status = %status, code = body.code(), "Sign-up rejected");
        match body.code() {
            "user_already_exists" | "email_exists" => Err(IdentityError::UserAlreadyExists),
            "weak_password" => Err(IdentityError::WeakPassword(body.text())),
            _ if body.text().contains("already registered") => {
                Err(IdentityError::UserAlreadyExists)
            }
            _ => Err(api_error(status, &body)),
        }
    }

    async fn sign_out(&self, user: &AuthUser) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(user.access_token())
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let (status, body) = read_error(response).await;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::SessionExpired),
            _ => Err(api_error(status, &body)),
        }
    }
}
