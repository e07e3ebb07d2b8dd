//! Wire types for the commerce backend's cart endpoint (v1).
//!
//! These mirror the JSON returned by `GET /cart` and are only ever read.
//! Optional fields default when absent so minor additions or omissions
//! upstream do not fail the whole sync; the shape of `items[]` itself is the
//! contract the conversion in [`super::conversions`] depends on.

use pickle_pot_core::PriceValue;
use serde::Deserialize;

/// A customer's cart as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
    /// Backend cart ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Required: a body without an `items` array is not a cart snapshot.
    pub items: Vec<RemoteCartItem>,
}

/// One line of the backend cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartItem {
    pub id: String,
    pub quantity: i64,
    /// Unit price (usually numeric).
    pub price: PriceValue,
    pub product: RemoteProduct,
    #[serde(default)]
    pub variant: RemoteVariant,
}

/// Product details nested in a cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    pub name: String,
    #[serde(default)]
    pub images: Vec<RemoteImage>,
    #[serde(default)]
    pub category: RemoteCategory,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCategory {
    #[serde(default)]
    pub name: String,
}

/// Variant details nested in a cart line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVariant {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub original_price: Option<PriceValue>,
}
