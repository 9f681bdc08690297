//! Tracker configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TRACKER_BASE_URL` - Public URL for the tracker (decides secure cookies)
//!
//! ## Required for the `remote` backend
//! - `TRACKER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `TRACKER_IDENTITY_URL` - Identity provider base URL (e.g. `https://id.example.com/auth/v1`)
//! - `TRACKER_IDENTITY_API_KEY` - Identity provider API key (high entropy)
//!
//! ## Optional
//! - `TRACKER_BACKEND` - `remote` (default) or `memory`
//! - `TRACKER_HOST` - Bind address (default: 127.0.0.1)
//! - `TRACKER_PORT` - Listen port (default: 3000)
//! - `TRACKER_REFETCH_AFTER_MUTATION` - Reload the item list after every change (default: false)
//! - `TRACKER_MAX_IMAGE_BYTES` - Largest accepted camera still (default: 1 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default upper bound for an uploaded camera still.
///
/// The still is stored base64-encoded in the session and rewritten with it on
/// every request, so this also bounds the per-request session payload.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Tracker application configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the tracker
    pub base_url: String,
    /// Where items and identities live
    pub backend: BackendConfig,
    /// Re-run the item loader after each successful mutation
    pub refetch_after_mutation: bool,
    /// Largest accepted camera still, in bytes
    pub max_image_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend selection.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// `PostgreSQL` document store plus an HTTP identity provider.
    Remote {
        /// `PostgreSQL` database connection URL (contains password)
        database_url: SecretString,
        /// Identity provider endpoint and key
        identity: IdentityConfig,
    },
    /// In-process store and identity provider; data is lost on restart.
    Memory,
}

/// Identity provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Base URL of the GoTrue-compatible REST API
    pub url: String,
    /// API key sent in the `apikey` header
    pub api_key: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`TrackerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let host = vars
            .or_default("TRACKER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRACKER_HOST".to_string(), e.to_string()))?;
        let port = vars
            .or_default("TRACKER_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRACKER_PORT".to_string(), e.to_string()))?;
        let base_url = vars.required("TRACKER_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TRACKER_BASE_URL".to_string(), e.to_string())
        })?;

        let backend = match vars.or_default("TRACKER_BACKEND", "remote").as_str() {
            "remote" => BackendConfig::Remote {
                database_url: vars.database_url("TRACKER_DATABASE_URL")?,
                identity: IdentityConfig {
                    url: vars.required("TRACKER_IDENTITY_URL")?,
                    api_key: vars.validated_secret("TRACKER_IDENTITY_API_KEY")?,
                },
            },
            "memory" => BackendConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "TRACKER_BACKEND".to_string(),
                    format!("expected 'remote' or 'memory', got '{other}'"),
                ));
            }
        };

        let refetch_after_mutation = parse_bool(
            "TRACKER_REFETCH_AFTER_MUTATION",
            &vars.or_default("TRACKER_REFETCH_AFTER_MUTATION", "false"),
        )?;
        let max_image_bytes = vars
            .optional("TRACKER_MAX_IMAGE_BYTES")
            .map(|v| {
                v.parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar("TRACKER_MAX_IMAGE_BYTES".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_IMAGE_BYTES);

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            refetch_after_mutation,
            max_image_bytes,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for an in-process instance (memory backend, no Sentry).
    ///
    /// Used by the integration tests and local demos.
    #[must_use]
    pub fn in_memory(base_url: impl Into<String>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: base_url.into(),
            backend: BackendConfig::Memory,
            refetch_after_mutation: false,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Typed access to a variable lookup.
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        (self.0)(primary_key)
            .or_else(|| (self.0)("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const GOOD_KEY: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_memory_backend_needs_only_base_url() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_BASE_URL", "http://localhost:3000"),
            ("TRACKER_BACKEND", "memory"),
        ]))
        .unwrap();

        assert!(matches!(config.backend, BackendConfig::Memory));
        assert_eq!(config.port, 3000);
        assert!(!config.refetch_after_mutation);
        assert_eq!(config.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_remote_backend_reads_identity_and_database() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_BASE_URL", "https://pantry.example.org"),
            ("DATABASE_URL", "postgres://db/pantry"),
            ("TRACKER_IDENTITY_URL", "https://id.test/auth/v1"),
            ("TRACKER_IDENTITY_API_KEY", GOOD_KEY),
            ("TRACKER_REFETCH_AFTER_MUTATION", "yes"),
        ]))
        .unwrap();

        match config.backend {
            BackendConfig::Remote {
                ref database_url,
                ref identity,
            } => {
                assert_eq!(database_url.expose_secret(), "postgres://db/pantry");
                assert_eq!(identity.url, "https://id.test/auth/v1");
            }
            BackendConfig::Memory => panic!("expected remote backend"),
        }
        assert!(config.refetch_after_mutation);
        assert!(config.is_secure());
    }

    #[test]
    fn test_remote_backend_missing_identity_url() {
        let err = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_BASE_URL", "http://localhost:3000"),
            ("TRACKER_DATABASE_URL", "postgres://db/pantry"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "TRACKER_IDENTITY_URL"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_BASE_URL", "http://localhost:3000"),
            ("TRACKER_BACKEND", "firestore"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_BASE_URL", "http://localhost:3000"),
            ("TRACKER_BACKEND", "memory"),
            ("TRACKER_PORT", "ninety"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "TRACKER_PORT"));
    }

    #[test]
    fn test_shannon_entropy_bounds() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy(GOOD_KEY) > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(validate_secret_strength("your-api-key-here", "K").is_err());
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "K").is_err());
        assert!(validate_secret_strength(GOOD_KEY, "K").is_ok());
    }

    #[test]
    fn test_identity_config_debug_redacts_key() {
        let config = IdentityConfig {
            url: "https://id.test".to_string(),
            api_key: SecretString::from("super_private_value"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://id.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_private_value"));
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert!(parse_bool("K", "maybe").is_err());
        assert!(!parse_bool("K", "OFF").unwrap());
    }
}
