//! Integration tests for The Pickle Pot.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pickle-pot-integration-tests
//! ```
//!
//! No external services are needed: each test starts a fake commerce
//! backend and a storefront on ephemeral ports and talks to them over HTTP.
//!
//! # Fake Backend
//!
//! `GET /cart` answers by bearer token:
//! - [`GOOD_TOKEN`] - the cart in [`REMOTE_CART`]
//! - [`FAILING_TOKEN`] - 500 Internal Server Error
//! - [`SLOW_FAILING_TOKEN`] - 500 after [`SLOW_BACKEND_DELAY`]
//! - anything else - 401 Unauthorized

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use pickle_pot_storefront::{
    AppState, app,
    config::{BackendConfig, StorefrontConfig},
};
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Token the fake backend accepts.
pub const GOOD_TOKEN: &str = "good-token";

/// Token the fake backend answers with a server error.
pub const FAILING_TOKEN: &str = "failing-token";

/// Token the fake backend answers with a server error, but only after
/// [`SLOW_BACKEND_DELAY`].
pub const SLOW_FAILING_TOKEN: &str = "slow-failing-token";

/// How long the fake backend stalls for [`SLOW_FAILING_TOKEN`].
pub const SLOW_BACKEND_DELAY: Duration = Duration::from_millis(500);

/// Cart returned for [`GOOD_TOKEN`].
pub const REMOTE_CART: &str = r#"{
    "id": "remote-cart-1",
    "items": [
        {
            "id": "7-16oz",
            "quantity": 2,
            "price": "18.50",
            "product": {
                "name": "Garlic Dill Spears",
                "images": [{"url": "https://cdn.example.com/dill.jpg"}],
                "category": {"name": "Pickles"},
                "isFeatured": true
            },
            "variant": {"size": "16oz", "originalPrice": "22.00"}
        },
        {
            "id": "9-4oz",
            "quantity": 1,
            "price": 6.25,
            "product": {"name": "Pickle Powder", "category": {"name": "Seasonings"}},
            "variant": {"size": "4oz"}
        }
    ]
}"#;

async fn fake_cart(headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(GOOD_TOKEN) => {
            let body: Value = serde_json::from_str(REMOTE_CART).expect("fixture is valid JSON");
            Json(body).into_response()
        }
        Some(FAILING_TOKEN) => (StatusCode::INTERNAL_SERVER_ERROR, "backend down").into_response(),
        Some(SLOW_FAILING_TOKEN) => {
            tokio::time::sleep(SLOW_BACKEND_DELAY).await;
            (StatusCode::INTERNAL_SERVER_ERROR, "backend down").into_response()
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}

/// Start the fake commerce backend and return its base URL.
pub async fn spawn_fake_backend() -> Url {
    let addr = spawn(Router::new().route("/cart", get(fake_cart))).await;
    Url::parse(&format!("http://{addr}/")).expect("Valid backend URL")
}

/// A running storefront plus a cookie-keeping client (one shopper).
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
}

impl TestContext {
    /// Start a storefront wired to `backend_url`.
    pub async fn start(backend_url: Url) -> Self {
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://localhost".to_string(),
            backend: BackendConfig::new(backend_url),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("Failed to build app state");
        let addr = spawn(app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{addr}"),
        }
    }

    /// Start a storefront with its own fake backend.
    pub async fn with_fake_backend() -> Self {
        Self::start(spawn_fake_backend().await).await
    }

    /// A second shopper (fresh cookie jar) on the same storefront.
    #[must_use]
    pub fn new_shopper(&self) -> Self {
        Self {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create HTTP client"),
            storefront_url: self.storefront_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// `GET` a JSON endpoint.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        read(resp).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        read(resp).await
    }
}

/// Status plus body: parsed JSON, `Null` when empty, otherwise the raw text.
async fn read(resp: reqwest::Response) -> (reqwest::StatusCode, Value) {
    let status = resp.status();
    let text = resp.text().await.expect("Failed to read response");
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}
