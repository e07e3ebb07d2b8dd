//! Cart state and the reducer that drives it.
//!
//! [`CartState`] is only ever produced by [`reduce`] or [`CartState::from_items`],
//! both of which rebuild `total` and `item_count` from the full item list.
//! The totals are never adjusted incrementally, so rounding error cannot
//! accumulate across operations.
//!
//! Guarantees after every operation:
//! - no two items share an id
//! - every item has a quantity of at least one
//! - `total` is the sum of `unit price × quantity`, rounded half-up to cents
//! - `item_count` is the sum of quantities

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::LineItemId;
use super::price::{PriceValue, round_to_cents};

/// Smallest quantity the storefront lets a shopper pick for a line.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Largest quantity the storefront lets a shopper pick for a line.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// Clamp a requested quantity into the range offered by the storefront.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    let clamped = quantity.clamp(i64::from(MIN_LINE_QUANTITY), i64::from(MAX_LINE_QUANTITY));
    u32::try_from(clamped).unwrap_or(MIN_LINE_QUANTITY)
}

/// Product family a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    #[default]
    Pickle,
    Powder,
}

impl ProductCategory {
    /// Infer the family from a backend category name.
    ///
    /// Any name mentioning "pickle" (case-insensitive) is a pickle; everything
    /// else is sold as a powder.
    #[must_use]
    pub fn from_category_name(name: &str) -> Self {
        if name.to_lowercase().contains("pickle") {
            Self::Pickle
        } else {
            Self::Powder
        }
    }
}

/// One row in the cart: a product variant and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Merge key; unique per product, size and spice level.
    pub id: LineItemId,
    /// Display name.
    pub name: String,
    /// Price per unit, as supplied.
    #[serde(alias = "price")]
    pub unit_price: PriceValue,
    /// Pre-sale price, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<PriceValue>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Jar or pouch size label, e.g. "6oz".
    #[serde(default)]
    pub size: String,
    pub quantity: u32,
    /// Requested delivery date (ISO date string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub category: ProductCategory,
    /// Marketing badge such as "Featured".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl LineItem {
    /// Create a line item with the required fields; metadata left empty.
    #[must_use]
    pub fn new(
        id: impl Into<LineItemId>,
        name: impl Into<String>,
        unit_price: impl Into<PriceValue>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price: unit_price.into(),
            original_price: None,
            image: None,
            size: String::new(),
            quantity,
            delivery_date: None,
            category: ProductCategory::default(),
            badge: None,
        }
    }

    /// Unit price as a decimal (malformed prices count as zero).
    #[must_use]
    pub fn unit_amount(&self) -> Decimal {
        self.unit_price.normalize()
    }

    /// Unrounded `unit price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_amount()
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// Operations accepted by the cart.
///
/// Serialized as `{ "type": "ADD_ITEM", "payload": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// Add an item, accumulating quantity if its id is already present.
    AddItem(LineItem),
    /// Remove the item with this id, if present.
    RemoveItem(LineItemId),
    /// Set an item's quantity; zero or below removes it.
    UpdateQuantity { id: LineItemId, quantity: i64 },
    /// Empty the cart.
    ClearCart,
    /// Replace every item with a snapshot translated from the remote cart.
    SyncFromRemote(Vec<LineItem>),
}

/// The cart's items plus totals derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", from = "StoredCart")]
pub struct CartState {
    items: Vec<LineItem>,
    total: Decimal,
    item_count: u64,
}

/// Wire shape accepted when deserializing; totals are recomputed, never trusted.
#[derive(Deserialize)]
struct StoredCart {
    #[serde(default)]
    items: Vec<LineItem>,
}

impl From<StoredCart> for CartState {
    fn from(stored: StoredCart) -> Self {
        Self::from_items(stored.items)
    }
}

impl CartState {
    /// The empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a cart from an arbitrary item list.
    ///
    /// Duplicate ids are folded into the first occurrence and zero-quantity
    /// rows are dropped, so the result always satisfies the cart invariants.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => merged.push(item),
            }
        }
        Self::recompute(merged)
    }

    /// Derive totals from an item list that already satisfies the invariants.
    fn recompute(items: Vec<LineItem>) -> Self {
        let subtotal = items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()));
        let item_count = items.iter().map(|item| u64::from(item.quantity)).sum();

        Self {
            items,
            total: round_to_cents(subtotal),
            item_count,
        }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of `unit price × quantity`, rounded to cents.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of quantities.
    #[must_use]
    pub const fn item_count(&self) -> u64 {
        self.item_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}

/// Apply an operation, returning the resulting state.
///
/// The input state is never modified. Operations that change nothing
/// (unknown ids, non-positive add quantities) return a clone of the input.
#[must_use]
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::AddItem(item) => add_item(state, item),
        CartAction::RemoveItem(id) => remove_item(state, &id),
        CartAction::UpdateQuantity { id, quantity } => update_quantity(state, &id, quantity),
        CartAction::ClearCart => CartState::empty(),
        CartAction::SyncFromRemote(items) => CartState::from_items(items),
    }
}

fn add_item(state: &CartState, item: LineItem) -> CartState {
    if item.quantity == 0 {
        return state.clone();
    }

    let mut items = state.items.clone();
    match items.iter_mut().find(|existing| existing.id == item.id) {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
        None => items.push(item),
    }
    CartState::recompute(items)
}

fn remove_item(state: &CartState, id: &LineItemId) -> CartState {
    if state.get(id).is_none() {
        return state.clone();
    }

    let items = state
        .items
        .iter()
        .filter(|item| &item.id != id)
        .cloned()
        .collect();
    CartState::recompute(items)
}

fn update_quantity(state: &CartState, id: &LineItemId, quantity: i64) -> CartState {
    if state.get(id).is_none() {
        return state.clone();
    }
    if quantity <= 0 {
        return remove_item(state, id);
    }

    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    let items = state
        .items
        .iter()
        .map(|item| {
            if &item.id == id {
                LineItem {
                    quantity,
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect();
    CartState::recompute(items)
}
