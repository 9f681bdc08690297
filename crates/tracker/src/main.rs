//! Pantry Tracker - server-rendered pantry inventory.
//!
//! This binary serves the tracker on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, one form POST per user action (post/redirect/get)
//! - Askama templates for server-side rendering
//! - Per-browser view state in tower-sessions
//! - Pantry items in a collection-addressed document store (`PostgreSQL`
//!   JSONB, or in memory)
//! - Authentication delegated to a GoTrue-compatible identity provider
//!
//! # Backends
//!
//! `TRACKER_BACKEND=remote` (default) needs a database and an identity
//! provider. `TRACKER_BACKEND=memory` keeps everything in process and loses
//! it on restart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pantry_tracker::app;
use pantry_tracker::config::{BackendConfig, TrackerConfig};
use pantry_tracker::identity::HttpIdentityProvider;
use pantry_tracker::state::AppState;
use pantry_tracker::store::{self, PostgresDocumentStore};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &TrackerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Configuration errors are reported before logging is up.
    let config = match TrackerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pantry_tracker=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Tracker stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: TrackerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p pantry-tracker-cli -- migrate
    let router = match &config.backend {
        BackendConfig::Remote {
            database_url,
            identity,
        } => {
            let pool = store::create_pool(database_url).await?;
            tracing::info!("Database pool created");

            let state = AppState::new(
                config.clone(),
                PostgresDocumentStore::new(pool.clone()),
                HttpIdentityProvider::new(identity),
                Some(pool.clone()),
            );
            app::router(state, PostgresStore::new(pool))
        }
        BackendConfig::Memory => {
            tracing::warn!("Using the in-memory backend; items and accounts are lost on restart");
            app::router(AppState::in_memory(config.clone()), MemoryStore::default())
        }
    };

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("tracker listening on {}", addr);

    app::serve(listener, router).await?;
    Ok(())
}
