//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::TrackerConfig;
use crate::identity::{IdentityProvider, MemoryIdentityProvider};
use crate::store::{DocumentStore, MemoryDocumentStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers the document store, the
/// identity provider and the configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TrackerConfig,
    store: Box<dyn DocumentStore>,
    identity: Box<dyn IdentityProvider>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Tracker configuration
    /// * `store` - Document store holding pantry items
    /// * `identity` - Identity provider for sign-in and sign-out
    /// * `pool` - Database pool checked by the readiness probe, if any
    #[must_use]
    pub fn new(
        config: TrackerConfig,
        store: impl DocumentStore + 'static,
        identity: impl IdentityProvider + 'static,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Box::new(store),
                identity: Box::new(identity),
                pool,
            }),
        }
    }

    /// State backed by the in-process store and identity provider.
    #[must_use]
    pub fn in_memory(config: TrackerConfig) -> Self {
        Self::new(
            config,
            MemoryDocumentStore::new(),
            MemoryIdentityProvider::new(),
            None,
        )
    }

    /// Get a reference to the tracker configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    /// Get the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get the database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
