//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart_sync` - Pull the signed-in customer's backend cart into the local cart

pub mod cart_sync;

pub use cart_sync::{CartSyncService, RemoteCartSource, SyncOutcome};
