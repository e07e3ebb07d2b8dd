//! Authentication route handlers.
//!
//! The storefront does not authenticate shoppers itself. A signed-in client
//! hands over the backend bearer token, which is kept in the session and
//! used for cart syncs until logout.

use axum::{Json, http::StatusCode};
use pickle_pot_core::CartState;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::SessionCart;

/// Token hand-over request body.
#[derive(Deserialize)]
pub struct TokenRequest {
    pub token: SecretString,
}

/// Store the backend token for this session.
#[instrument(skip_all)]
pub async fn token(session: Session, Json(request): Json<TokenRequest>) -> Result<StatusCode> {
    let token = request.token.expose_secret().trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("token must not be empty".to_string()));
    }

    SessionCart::new(session).set_token(token).await?;
    add_breadcrumb("auth", "Token stored", None);
    info!("Backend token stored in session");

    Ok(StatusCode::NO_CONTENT)
}

/// Forget the token and reset the cart.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<CartState>> {
    SessionCart::new(session).sign_out().await?;
    add_breadcrumb("auth", "Signed out", None);
    info!("Session signed out");

    Ok(Json(CartState::empty()))
}
