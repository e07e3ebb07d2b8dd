//! Session-stored cart and token.
//!
//! The session is the cart's persistence: every cart request loads the cart,
//! applies one operation and saves it back before responding. A sync that
//! does not succeed saves nothing.

use pickle_pot_core::CartState;
use secrecy::SecretString;
use tower_sessions::Session;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the shopper's cart.
    pub const CART: &str = "cart";

    /// Key for the backend bearer token of a signed-in customer.
    pub const AUTH_TOKEN: &str = "auth_token";
}

/// Cart and token access on top of a request's session.
#[derive(Clone)]
pub struct SessionCart {
    session: Session,
}

impl SessionCart {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load the cart, or an empty one when none has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(&self) -> Result<CartState, tower_sessions::session::Error> {
        Ok(self
            .session
            .get::<CartState>(keys::CART)
            .await?
            .unwrap_or_default())
    }

    /// Save the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save(&self, state: &CartState) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::CART, state).await
    }

    /// Backend token, if the shopper is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn token(&self) -> Result<Option<SecretString>, tower_sessions::session::Error> {
        Ok(self
            .session
            .get::<String>(keys::AUTH_TOKEN)
            .await?
            .filter(|token| !token.is_empty())
            .map(SecretString::from))
    }

    /// Remember the backend token for later syncs.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn set_token(&self, token: &str) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::AUTH_TOKEN, token).await
    }

    /// Forget the token and reset the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn sign_out(&self) -> Result<(), tower_sessions::session::Error> {
        self.session
            .remove::<String>(keys::AUTH_TOKEN)
            .await?;
        self.save(&CartState::empty()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pickle_pot_core::{CartAction, LineItem, reduce};
    use secrecy::ExposeSecret;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> SessionCart {
        SessionCart::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_load_defaults_to_empty_cart() {
        assert_eq!(session().load().await.unwrap(), CartState::empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let cart = session();
        let state = reduce(
            &CartState::empty(),
            CartAction::AddItem(LineItem::new("1-6oz", "Mango", "$12.99", 2)),
        );
        cart.save(&state).await.unwrap();
        assert_eq!(cart.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_token_round_trip_and_sign_out() {
        let cart = session();
        assert!(cart.token().await.unwrap().is_none());

        cart.set_token("token-abc").await.unwrap();
        assert_eq!(
            cart.token().await.unwrap().unwrap().expose_secret(),
            "token-abc"
        );

        let state = reduce(
            &CartState::empty(),
            CartAction::AddItem(LineItem::new("A", "Lime", "$4.00", 1)),
        );
        cart.save(&state).await.unwrap();

        cart.sign_out().await.unwrap();
        assert!(cart.token().await.unwrap().is_none());
        assert!(cart.load().await.unwrap().is_empty());
    }
}
