//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart (JSON)
//! GET  /cart                   - Current cart
//! POST /cart/add               - Add item (quantity 1-10)
//! POST /cart/update            - Set quantity (0 or less removes)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//! POST /cart/sync              - Pull the backend cart (fails open)
//! GET  /cart/summary           - Checkout breakdown (?promo=CODE)
//!
//! # Auth
//! POST /auth/token             - Store backend bearer token
//! POST /auth/logout            - Drop token and reset cart
//! ```

pub mod auth;
pub mod cart;

use axum::{
    Router,
    body::Body,
    http::{Request, Uri},
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/sync", post(cart::sync))
        .route("/summary", get(cart::summary))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(auth::token))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Cart routes
        .nest("/cart", cart_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        .fallback(not_found)
}

/// Build the complete application with sessions, tracing and request IDs.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{BackendConfig, StorefrontConfig};

    fn test_app() -> Router {
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig::new(Url::parse("http://127.0.0.1:9/").unwrap()),
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config).unwrap())
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_returns_updated_cart() {
        let response = test_app()
            .oneshot(post_json(
                "/cart/add",
                r#"{"id": "1-6oz", "name": "Mango", "price": "$12.99", "quantity": 2}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cart = json_body(response).await;
        assert_eq!(cart["total"], "25.98");
        assert_eq!(cart["itemCount"], 2);
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_quantity() {
        for quantity in [0, 11] {
            let body = format!(r#"{{"id": "A", "name": "Lime", "price": 4, "quantity": {quantity}}}"#);
            let response = test_app()
                .oneshot(post_json("/cart/add", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_summary_rejects_unknown_promo() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/cart/summary?promo=SAVE99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Bad request: invalid promo code: SAVE99"
        );
    }

    #[tokio::test]
    async fn test_sync_without_token_is_skipped() {
        let response = test_app()
            .oneshot(post_json("/cart/sync", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["sync"], "skipped");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = test_app()
            .oneshot(HttpRequest::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Not found: /nope");
    }
}
