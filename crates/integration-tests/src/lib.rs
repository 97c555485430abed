//! Integration tests for Dendy Food.
//!
//! Each test starts its own storefront on an ephemeral port, backed by an
//! in-memory catalog, plus a fake order notification sink that records
//! what it receives. Nothing external is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dendy-food-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - Product CRUD over HTTP
//! - `cart_checkout` - Session cart and order placement

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;

use dendy_food_storefront::config::{OrderConfig, StorefrontConfig};
use dendy_food_storefront::db::{CatalogStore, MemoryBackend};
use dendy_food_storefront::services::WebhookNotifier;
use dendy_food_storefront::state::AppState;

/// Request timeout the storefront uses towards the fake sink.
pub const SINK_TIMEOUT: Duration = Duration::from_secs(1);

/// How long a [`SinkMode::Slow`] sink takes to accept.
pub const SLOW_SINK_DELAY: Duration = Duration::from_millis(300);

/// Chat id the storefront is configured with.
pub const TEST_CHAT_ID: &str = "-4883792073";

/// How the fake sink answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// 200 OK.
    Accept,
    /// 500 Internal Server Error.
    Reject,
    /// 200 OK after [`SLOW_SINK_DELAY`].
    Slow,
    /// Never answers within [`SINK_TIMEOUT`].
    Hang,
}

/// Fake notification sink: records every body it receives.
#[derive(Debug)]
pub struct FakeSink {
    mode: SinkMode,
    received: Mutex<Vec<Value>>,
}

impl FakeSink {
    /// Bodies received so far.
    ///
    /// # Panics
    ///
    /// Panics if a sink handler panicked while holding the lock.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)]
async fn sink_handler(State(sink): State<Arc<FakeSink>>, Json(body): Json<Value>) -> StatusCode {
    sink.received.lock().unwrap().push(body);
    match sink.mode {
        SinkMode::Accept => StatusCode::OK,
        SinkMode::Reject => StatusCode::INTERNAL_SERVER_ERROR,
        SinkMode::Slow => {
            tokio::time::sleep(SLOW_SINK_DELAY).await;
            StatusCode::OK
        }
        SinkMode::Hang => {
            tokio::time::sleep(SINK_TIMEOUT * 10).await;
            StatusCode::OK
        }
    }
}

/// A running storefront plus its collaborators.
pub struct TestContext {
    /// Client with a cookie store, so it keeps one session.
    pub client: Client,
    pub base_url: String,
    pub sink: Arc<FakeSink>,
    pub catalog: MemoryBackend,
}

impl TestContext {
    /// Start a fake sink and a storefront wired to it.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot be started.
    #[allow(clippy::unwrap_used)]
    pub async fn new(mode: SinkMode) -> Self {
        let sink = Arc::new(FakeSink {
            mode,
            received: Mutex::new(Vec::new()),
        });
        let sink_app = Router::new()
            .route("/sendMessage", post(sink_handler))
            .with_state(Arc::clone(&sink));
        let sink_addr = spawn(sink_app).await;

        let mut orders = OrderConfig::new(
            SecretString::from(format!("http://{sink_addr}/sendMessage")),
            TEST_CHAT_ID,
        );
        orders.webhook_timeout = SINK_TIMEOUT;
        let config = StorefrontConfig::new("unused.json", orders);

        let catalog = MemoryBackend::new();
        let notifier = WebhookNotifier::new(&config.orders).unwrap();
        let state = AppState::new(
            config,
            CatalogStore::new(catalog.clone()),
            Arc::new(notifier),
        );
        let addr = spawn(dendy_food_storefront::app(state)).await;

        Self {
            client: Client::builder().cookie_store(true).build().unwrap(),
            base_url: format!("http://{addr}"),
            sink,
            catalog,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create a product through the API and return its JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is not answered with 201.
    #[allow(clippy::unwrap_used)]
    pub async fn create_product(&self, body: &Value) -> Value {
        let resp = self
            .client
            .post(self.url("/products"))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.unwrap()
    }
}

/// Serve `app` on an ephemeral local port.
#[allow(clippy::unwrap_used)]
async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}
