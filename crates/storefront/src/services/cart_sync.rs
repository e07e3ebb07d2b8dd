//! Reconcile the local cart with the customer's cart on the backend.
//!
//! Sync is one-directional: a successful fetch replaces the local items
//! wholesale. A failed fetch leaves the local cart untouched (fail open), so
//! shoppers keep a possibly stale cart rather than losing it.

use pickle_pot_core::{CartAction, CartState, reduce};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::backend::{BackendClient, BackendError, RemoteCart, convert_remote_cart};

/// Where remote cart snapshots come from.
pub trait RemoteCartSource {
    /// Fetch the cart belonging to the holder of `token`.
    fn fetch_cart(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<RemoteCart, BackendError>> + Send;
}

impl RemoteCartSource for BackendClient {
    async fn fetch_cart(&self, token: &SecretString) -> Result<RemoteCart, BackendError> {
        self.get_cart(token).await
    }
}

/// Result of a sync attempt. Every variant carries a usable cart.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Remote cart fetched and applied.
    Synced(CartState),
    /// No session token; nothing was fetched.
    Skipped(CartState),
    /// Fetch failed; the local cart is returned unchanged.
    Failed { state: CartState, error: BackendError },
}

impl SyncOutcome {
    /// The cart to keep serving.
    #[must_use]
    pub fn into_state(self) -> CartState {
        match self {
            Self::Synced(state) | Self::Skipped(state) | Self::Failed { state, .. } => state,
        }
    }

    #[must_use]
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }

    /// Short label for responses and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Synced(_) => "synced",
            Self::Skipped(_) => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Pulls the backend cart into the local cart.
#[derive(Clone)]
pub struct CartSyncService<S = BackendClient> {
    source: S,
}

impl<S: RemoteCartSource> CartSyncService<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Sync `local` from the backend.
    ///
    /// Without a token the cart is returned as-is and no request is made.
    /// The fetch must complete before anything is applied; a partial or
    /// failed fetch never changes the cart.
    #[instrument(skip_all, fields(has_token = token.is_some()))]
    pub async fn sync(&self, local: &CartState, token: Option<&SecretString>) -> SyncOutcome {
        let Some(token) = token else {
            return SyncOutcome::Skipped(local.clone());
        };

        match self.source.fetch_cart(token).await {
            Ok(remote) => {
                let items = convert_remote_cart(remote);
                let state = reduce(local, CartAction::SyncFromRemote(items));
                info!(
                    items = state.items().len(),
                    item_count = state.item_count(),
                    "Cart synced from backend"
                );
                SyncOutcome::Synced(state)
            }
            Err(error) => {
                warn!(error = %error, "Cart sync failed, keeping local cart");
                SyncOutcome::Failed {
                    state: local.clone(),
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pickle_pot_core::LineItem;
    use rust_decimal::Decimal;

    use super::*;

    struct FakeSource {
        response: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn ok(json: &'static str) -> Self {
            Self {
                response: Some(json),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl RemoteCartSource for FakeSource {
        async fn fetch_cart(&self, _token: &SecretString) -> Result<RemoteCart, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Some(json) => Ok(serde_json::from_str(json)?),
                None => Err(BackendError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                }),
            }
        }
    }

    fn local_cart() -> CartState {
        reduce(
            &CartState::empty(),
            CartAction::AddItem(LineItem::new("1-6oz", "Mango", "$12.99", 2)),
        )
    }

    fn token() -> SecretString {
        SecretString::from("token-abc")
    }

    const REMOTE: &str = r#"{"items": [{
        "id": "item1", "quantity": 3, "price": 4.25,
        "product": {"name": "Lime Pickle", "category": {"name": "Pickles"}},
        "variant": {"size": "8oz"}
    }]}"#;

    #[tokio::test]
    async fn test_sync_without_token_skips_fetch() {
        let service = CartSyncService::new(FakeSource::ok(REMOTE));
        let outcome = service.sync(&local_cart(), None).await;

        assert_eq!(outcome.label(), "skipped");
        assert_eq!(outcome.into_state(), local_cart());
        assert_eq!(service.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sync_replaces_local_items() {
        let service = CartSyncService::new(FakeSource::ok(REMOTE));
        let outcome = service.sync(&local_cart(), Some(&token())).await;

        assert!(outcome.is_synced());
        let state = outcome.into_state();
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items().first().unwrap().id.as_str(), "item1");
        assert_eq!(state.item_count(), 3);
        assert_eq!(state.total(), Decimal::from_str("12.75").unwrap());
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_local_cart() {
        let service = CartSyncService::new(FakeSource::failing());
        let outcome = service.sync(&local_cart(), Some(&token())).await;

        assert_eq!(outcome.label(), "failed");
        assert!(matches!(
            &outcome,
            SyncOutcome::Failed {
                error: BackendError::Status { status: 502, .. },
                ..
            }
        ));
        assert_eq!(outcome.into_state(), local_cart());
    }

    #[tokio::test]
    async fn test_sync_with_missing_items_keeps_local_cart() {
        let service = CartSyncService::new(FakeSource::ok("{}"));
        let outcome = service.sync(&local_cart(), Some(&token())).await;

        assert!(matches!(&outcome, SyncOutcome::Failed { error: BackendError::Parse(_), .. }));
        assert_eq!(outcome.into_state(), local_cart());
    }

    #[tokio::test]
    async fn test_sync_with_empty_items_clears_cart() {
        let service = CartSyncService::new(FakeSource::ok(r#"{"items": []}"#));
        let outcome = service.sync(&local_cart(), Some(&token())).await;

        assert!(outcome.is_synced());
        assert!(outcome.into_state().is_empty());
    }

    #[tokio::test]
    async fn test_sync_with_unparseable_payload_keeps_local_cart() {
        let service = CartSyncService::new(FakeSource::ok(r#"{"items": "nope"}"#));
        let outcome = service.sync(&local_cart(), Some(&token())).await;

        assert!(matches!(&outcome, SyncOutcome::Failed { error: BackendError::Parse(_), .. }));
        assert_eq!(outcome.into_state(), local_cart());
    }
}
