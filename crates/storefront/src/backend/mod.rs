//! Commerce backend API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - The backend is the source of truth for signed-in customers' carts;
//!   the storefront only reads it to resynchronise the local cart
//! - Wire types live in [`types`] and are translated into cart line items
//!   by [`conversions`], so backend schema changes stay out of the cart core
//!
//! # Example
//!
//! ```rust,ignore
//! use pickle_pot_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?;
//! let remote = client.get_cart(&token).await?;
//! let items = convert_remote_cart(remote);
//! ```

mod client;
pub mod conversions;
pub mod types;

pub use client::BackendClient;
pub use conversions::convert_remote_cart;
pub use types::RemoteCart;

use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token was rejected.
    #[error("Unauthorized: backend rejected the session token")]
    Unauthorized,

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status {
        status: u16,
        /// First part of the response body, for diagnostics.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 503: maintenance");
        assert_eq!(
            BackendError::Unauthorized.to_string(),
            "Unauthorized: backend rejected the session token"
        );
    }
}
