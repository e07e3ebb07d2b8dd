//! HTTP client for the commerce backend.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;

use super::BackendError;
use super::types::RemoteCart;

/// Longest body excerpt kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 500;

/// Client for the commerce backend API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch the signed-in customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the token is rejected, the
    /// backend answers with a non-success status or the body is not a cart.
    #[instrument(skip(self, token), fields(base_url = %self.inner.base_url))]
    pub async fn get_cart(&self, token: &SecretString) -> Result<RemoteCart, BackendError> {
        let endpoint = self.inner.base_url.join("cart")?;

        let response = self
            .inner
            .client
            .get(endpoint)
            .bearer_auth(token.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(BackendError::Unauthorized);
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = excerpt(&response_text);
            tracing::error!(
                status = %status,
                body = %body,
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let cart: RemoteCart = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&response_text),
                "Failed to parse backend cart response"
            );
            BackendError::Parse(e)
        })?;

        debug!(items = cart.items.len(), "Fetched backend cart");
        Ok(cart)
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(600);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), BODY_EXCERPT_CHARS);
    }

    #[test]
    fn test_client_keeps_base_url() {
        let config = BackendConfig::new(Url::parse("http://localhost:8000/api/").unwrap());
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/");
    }
}
