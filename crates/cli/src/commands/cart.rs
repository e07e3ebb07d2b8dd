//! Cart file commands.
//!
//! # Usage
//!
//! ```bash
//! pp-cli add --id 1-6oz --name "Mango Pickle" --price '$12.99' -q 2 --size 6oz
//! pp-cli update 1-6oz 3
//! pp-cli remove 1-6oz
//! pp-cli summary --promo FREESHIP
//! pp-cli clear
//! ```
//!
//! # Environment Variables
//!
//! - `PP_CART_FILE` - Cart file path (default: `cart.json`)

use std::path::Path;

use pickle_pot_core::{
    CartAction, CartState, CartStore, CheckoutSummary, LineItem, LineItemId, Price, PriceError,
    PriceValue, ProductCategory, ProductId, PromoCode, PromoCodeError, clamp_quantity,
};
use thiserror::Error;

use crate::store::{FileStoreError, JsonFilePersistence};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Cart file could not be read or written.
    #[error(transparent)]
    Store(#[from] FileStoreError),

    /// Price argument is not a number.
    #[error("Invalid price {value:?}: {source}")]
    InvalidPrice { value: String, source: PriceError },

    /// Unknown promo code.
    #[error(transparent)]
    Promo(#[from] PromoCodeError),

    /// Neither `--id` nor `--product-id` was given.
    #[error("Either --id or --product-id is required")]
    MissingId,
}

/// Arguments of `pp-cli add`.
#[derive(Debug, Clone)]
pub struct AddInput {
    pub id: Option<String>,
    pub product_id: Option<String>,
    pub spice: Option<String>,
    pub name: String,
    pub price: String,
    pub quantity: i64,
    pub size: Option<String>,
    pub category: Option<String>,
    pub original_price: Option<String>,
}

/// Parse a price argument, rejecting anything the cart would count as zero.
fn price_arg(value: String) -> Result<PriceValue, CartCommandError> {
    let price = PriceValue::from(value);
    match price.try_normalize() {
        Ok(_) => Ok(price),
        Err(source) => Err(CartCommandError::InvalidPrice {
            value: match price {
                PriceValue::Text(text) => text,
                PriceValue::Number(n) => n.to_string(),
            },
            source,
        }),
    }
}

/// Build the line item for `pp-cli add`.
///
/// The quantity is clamped to the range the storefront offers.
///
/// # Errors
///
/// Returns an error if either price does not parse or no id can be formed.
pub fn build_item(input: AddInput) -> Result<LineItem, CartCommandError> {
    let size = input.size.unwrap_or_default();
    let id = match (input.id, input.product_id) {
        (Some(id), _) => LineItemId::new(id),
        (None, Some(product_id)) => LineItemId::for_variant(
            &ProductId::new(product_id),
            &size,
            input.spice.as_deref(),
        ),
        (None, None) => return Err(CartCommandError::MissingId),
    };

    let quantity = clamp_quantity(input.quantity);
    if i64::from(quantity) != input.quantity {
        tracing::warn!("Quantity {} clamped to {quantity}", input.quantity);
    }

    let mut item = LineItem::new(id, input.name, price_arg(input.price)?, quantity);
    item.size = size;
    item.original_price = input.original_price.map(price_arg).transpose()?;
    if let Some(category) = input.category.as_deref() {
        item.category = ProductCategory::from_category_name(category);
    }
    Ok(item)
}

fn open(path: &Path) -> Result<CartStore<JsonFilePersistence>, FileStoreError> {
    CartStore::open(JsonFilePersistence::new(path))
}

fn dispatch(path: &Path, action: CartAction) -> Result<CartState, FileStoreError> {
    let mut store = open(path)?;
    Ok(store.dispatch(action)?.clone())
}

/// Log the cart contents.
fn log_cart(state: &CartState) {
    if state.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in state.items() {
        tracing::info!(
            "{} x{} {} @ {} = {}",
            item.id,
            item.quantity,
            item.name,
            Price::usd(item.unit_amount()).display(),
            Price::usd(pickle_pot_core::round_to_cents(item.line_total())).display(),
        );
    }
    tracing::info!(
        "{} item(s), total {}",
        state.item_count(),
        Price::usd(state.total()).display()
    );
}

/// Show the cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read.
pub fn show(path: &Path) -> Result<(), CartCommandError> {
    log_cart(open(path)?.state());
    Ok(())
}

/// Add an item to the cart.
///
/// # Errors
///
/// Returns an error if a price is invalid or the cart file cannot be used.
pub fn add(path: &Path, input: AddInput) -> Result<(), CartCommandError> {
    let item = build_item(input)?;
    tracing::info!("Adding {} x{}", item.id, item.quantity);
    log_cart(&dispatch(path, CartAction::AddItem(item))?);
    Ok(())
}

/// Set an item's quantity.
///
/// # Errors
///
/// Returns an error if the cart file cannot be used.
pub fn update(path: &Path, id: &str, quantity: i64) -> Result<(), CartCommandError> {
    let action = CartAction::UpdateQuantity {
        id: LineItemId::new(id),
        quantity,
    };
    log_cart(&dispatch(path, action)?);
    Ok(())
}

/// Remove an item.
///
/// # Errors
///
/// Returns an error if the cart file cannot be used.
pub fn remove(path: &Path, id: &str) -> Result<(), CartCommandError> {
    log_cart(&dispatch(path, CartAction::RemoveItem(LineItemId::new(id)))?);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be written.
pub fn clear(path: &Path) -> Result<(), CartCommandError> {
    dispatch(path, CartAction::ClearCart)?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Compute the checkout breakdown.
///
/// # Errors
///
/// Returns an error if the promo code is unknown or the cart file cannot be
/// read.
pub fn checkout(path: &Path, promo: Option<&str>) -> Result<CheckoutSummary, CartCommandError> {
    let promo = promo.map(str::parse::<PromoCode>).transpose()?;
    let store = open(path)?;
    Ok(CheckoutSummary::compute(store.state(), promo))
}

/// Show the checkout breakdown.
///
/// # Errors
///
/// Returns an error if the promo code is unknown or the cart file cannot be
/// read.
pub fn summary(path: &Path, promo: Option<&str>) -> Result<(), CartCommandError> {
    let summary = checkout(path, promo)?;

    tracing::info!("Subtotal: {}", Price::usd(summary.subtotal).display());
    if let Some(code) = summary.promo {
        tracing::info!(
            "Discount ({code}, {}): {}",
            code.description(),
            Price::usd(-summary.discount).display()
        );
    }
    tracing::info!("Shipping: {}", Price::usd(summary.shipping).display());
    tracing::info!("Tax: {}", Price::usd(summary.tax).display());
    tracing::info!("Total: {}", Price::usd(summary.total).display());
    Ok(())
}
