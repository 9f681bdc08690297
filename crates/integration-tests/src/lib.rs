//! Integration tests for Pantry Tracker.
//!
//! Each test boots the full router on an ephemeral port with the in-memory
//! store, identity provider and session store, then drives it like a browser:
//! a cookie-keeping `reqwest` client that follows redirects.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pantry-tracker-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

use pantry_tracker::app;
use pantry_tracker::config::TrackerConfig;
use pantry_tracker::state::AppState;

/// Password accepted by the in-memory identity provider.
pub const PASSWORD: &str = "correct horse battery";

/// A running tracker plus one browser.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// Boot a tracker with default settings.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Boot a tracker after adjusting its configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut TrackerConfig)) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("Failed to read local address");
        let base_url = format!("http://{addr}");

        let mut config = TrackerConfig::in_memory(&base_url);
        configure(&mut config);
        let router = app::router(AppState::in_memory(config), MemoryStore::default());
        tokio::spawn(app::serve(listener, router));

        Self {
            base_url,
            client: browser(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Render the tracker page (or wherever it redirects).
    pub async fn page(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Failed to load tracker page")
    }

    /// Body of the tracker page.
    pub async fn page_html(&self) -> String {
        self.page().await.text().await.expect("Failed to read body")
    }

    /// Submit a form and follow the redirect.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to submit form")
    }

    /// Create an account and sign in with this browser.
    pub async fn sign_up(&self, email: &str) -> Response {
        self.post_form(
            "/signup",
            &[
                ("email", email),
                ("password", PASSWORD),
                ("password_confirm", PASSWORD),
            ],
        )
        .await
    }

    /// Add an item through the add form; returns the resulting page body.
    pub async fn add_item(&self, name: &str, quantity: &str, expiration_date: &str) -> String {
        self.post_form(
            "/items",
            &[
                ("name", name),
                ("quantity", quantity),
                ("expiration_date", expiration_date),
            ],
        )
        .await
        .text()
        .await
        .expect("Failed to read body")
    }

    /// Another browser against the same server.
    #[must_use]
    pub fn second_browser(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: browser(),
        }
    }
}

fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// IDs of the items listed on a tracker page, in display order.
#[must_use]
pub fn item_ids(html: &str) -> Vec<String> {
    html.split("action=\"/items/")
        .skip(1)
        .filter_map(|rest| rest.split_once("/edit\"").map(|(id, _)| id.to_string()))
        .filter(|id| !id.contains('"'))
        .collect()
}
