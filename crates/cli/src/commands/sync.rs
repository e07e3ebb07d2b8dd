//! Backend cart sync command.
//!
//! # Usage
//!
//! ```bash
//! pp-cli sync --backend-url https://api.example.com/ --token "$TOKEN"
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BACKEND_URL` - Default for `--backend-url`
//! - `PP_AUTH_TOKEN` - Default for `--token`
//!
//! A failed fetch is reported but leaves the cart file untouched, and the
//! command still succeeds.

use std::path::Path;

use pickle_pot_core::{CartAction, CartStore};
use pickle_pot_storefront::backend::{BackendClient, BackendError};
use pickle_pot_storefront::config::{BackendConfig, ConfigError, parse_backend_url};
use pickle_pot_storefront::services::{CartSyncService, RemoteCartSource, SyncOutcome};
use secrecy::SecretString;
use thiserror::Error;

use crate::store::{FileStoreError, JsonFilePersistence};

/// Errors that can occur during sync.
#[derive(Debug, Error)]
pub enum SyncCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create backend client: {0}")]
    Client(#[from] BackendError),

    #[error(transparent)]
    Store(#[from] FileStoreError),
}

/// Sync the cart file from the backend.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the client cannot be built, or
/// the cart file cannot be read or written. Backend failures are not errors.
pub async fn run(
    path: &Path,
    backend_url: &str,
    token: Option<&SecretString>,
) -> Result<(), SyncCommandError> {
    let base_url = parse_backend_url("--backend-url", backend_url)?;
    let client = BackendClient::new(&BackendConfig::new(base_url))?;

    sync_file(path, &CartSyncService::new(client), token).await
}

/// Sync `path` through `service`, writing the file only when the fetch succeeded.
pub(crate) async fn sync_file<S: RemoteCartSource>(
    path: &Path,
    service: &CartSyncService<S>,
    token: Option<&SecretString>,
) -> Result<(), SyncCommandError> {
    let mut store = CartStore::open(JsonFilePersistence::new(path))?;

    match service.sync(store.state(), token).await {
        SyncOutcome::Synced(state) => {
            store.dispatch(CartAction::SyncFromRemote(state.items().to_vec()))?;
            tracing::info!(
                "Cart synced: {} item(s), total ${}",
                store.state().item_count(),
                store.state().total()
            );
        }
        SyncOutcome::Skipped(_) => {
            tracing::warn!("No token given (--token or PP_AUTH_TOKEN); cart left unchanged");
        }
        SyncOutcome::Failed { error, .. } => {
            tracing::warn!("Sync failed, keeping local cart: {error}");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use pickle_pot_core::{CartPersistence, CartState, LineItem};
    use pickle_pot_storefront::backend::RemoteCart;

    use super::*;

    struct StaticSource(Option<&'static str>);

    impl RemoteCartSource for StaticSource {
        async fn fetch_cart(&self, _token: &SecretString) -> Result<RemoteCart, BackendError> {
            match self.0 {
                Some(json) => Ok(serde_json::from_str(json)?),
                None => Err(BackendError::Unauthorized),
            }
        }
    }

    const REMOTE: &str = r#"{"items": [
        {"id": "r1", "quantity": 2, "price": "5.50", "product": {"name": "Dill"}}
    ]}"#;

    fn temp_cart_path() -> PathBuf {
        std::env::temp_dir().join(format!("pp-cart-sync-{}.json", uuid::Uuid::new_v4()))
    }

    fn seed(path: &Path) -> CartState {
        let mut store = CartStore::open(JsonFilePersistence::new(path)).unwrap();
        store
            .dispatch(CartAction::AddItem(LineItem::new("local", "Lime", "4.00", 1)))
            .unwrap()
            .clone()
    }

    fn saved(path: &Path) -> CartState {
        JsonFilePersistence::new(path).load().unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_sync_replaces_file_contents() {
        let path = temp_cart_path();
        seed(&path);

        let service = CartSyncService::new(StaticSource(Some(REMOTE)));
        let token = SecretString::from("t");
        sync_file(&path, &service, Some(&token)).await.unwrap();

        let state = saved(&path);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items().first().unwrap().id.as_str(), "r1");
        assert_eq!(state.total().to_string(), "11.00");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_failed_sync_keeps_file() {
        let path = temp_cart_path();
        let before = seed(&path);

        let service = CartSyncService::new(StaticSource(None));
        let token = SecretString::from("t");
        sync_file(&path, &service, Some(&token)).await.unwrap();
        assert_eq!(saved(&path), before);

        sync_file(&path, &service, None).await.unwrap();
        assert_eq!(saved(&path), before);

        std::fs::remove_file(&path).unwrap();
    }
}
