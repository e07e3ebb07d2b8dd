//! Pickle Pot Core - Cart types and pure cart logic.
//!
//! This crate provides the cart model shared by every Pickle Pot component:
//! - `storefront` - JSON cart service with session-scoped carts
//! - `cli` - Command-line cart tool backed by a JSON file
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no I/O,
//! no HTTP clients. Storage is reached through the [`CartPersistence`] port
//! and remote carts arrive already translated into [`LineItem`]s.
//!
//! # Modules
//!
//! - [`types`] - Prices, keys, the cart reducer, the cart store and checkout math
//!
//! # Example
//!
//! ```rust
//! use pickle_pot_core::{CartAction, CartState, LineItem, reduce};
//!
//! let cart = reduce(
//!     &CartState::empty(),
//!     CartAction::AddItem(LineItem::new("1-6oz", "Mango Pickle", "$12.99", 2)),
//! );
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().to_string(), "25.98");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
