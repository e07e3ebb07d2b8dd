//! Core types for The Pickle Pot.
//!
//! This module provides the cart model and type-safe wrappers around it.

pub mod cart;
pub mod checkout;
pub mod id;
pub mod price;
pub mod store;

pub use cart::{
    CartAction, CartState, LineItem, MAX_LINE_QUANTITY, MIN_LINE_QUANTITY, ProductCategory,
    clamp_quantity, reduce,
};
pub use checkout::{CheckoutSummary, PromoCode, PromoCodeError};
pub use id::{LineItemId, ProductId};
pub use price::{CurrencyCode, Price, PriceError, PriceValue, parse_price, round_to_cents};
pub use store::{CartPersistence, CartStore, MemoryPersistence};
