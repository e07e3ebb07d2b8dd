//! Order summary shown before checkout: promo discount, shipping and tax.
//!
//! Every figure is derived from the cart subtotal and rounded to cents.
//! Shipping is free from [`FREE_SHIPPING_THRESHOLD`] upward (measured before
//! any discount) and tax is charged on the discounted subtotal.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart::CartState;
use super::price::round_to_cents;

/// Subtotal at which standard shipping becomes free ($25.00).
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(2500, 0, 0, false, 2);

/// Flat shipping rate below the threshold ($5.99).
pub const STANDARD_SHIPPING: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Sales tax rate (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Promo code not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid promo code: {0}")]
pub struct PromoCodeError(pub String);

/// Promo codes accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoCode {
    /// $5 off the order.
    #[serde(rename = "PICKLE50")]
    Pickle50,
    /// 10% off a first order.
    #[serde(rename = "WELCOME10")]
    Welcome10,
    /// $5 off and free shipping.
    #[serde(rename = "FREESHIP")]
    FreeShip,
}

impl PromoCode {
    /// Code as typed by the shopper.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pickle50 => "PICKLE50",
            Self::Welcome10 => "WELCOME10",
            Self::FreeShip => "FREESHIP",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Pickle50 => "Save $5 on your order",
            Self::Welcome10 => "10% off first order",
            Self::FreeShip => "Free shipping",
        }
    }

    /// Discount for a subtotal, never more than the subtotal itself.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let raw = match self {
            Self::Pickle50 | Self::FreeShip => Decimal::new(5, 0),
            Self::Welcome10 => subtotal * Decimal::new(1, 1),
        };
        round_to_cents(raw.min(subtotal).max(Decimal::ZERO))
    }

    #[must_use]
    pub const fn waives_shipping(&self) -> bool {
        matches!(self, Self::FreeShip)
    }
}

impl FromStr for PromoCode {
    type Err = PromoCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PICKLE50" => Ok(Self::Pickle50),
            "WELCOME10" => Ok(Self::Welcome10),
            "FREESHIP" => Ok(Self::FreeShip),
            _ => Err(PromoCodeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Price breakdown for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub promo: Option<PromoCode>,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    /// `subtotal - discount + shipping + tax`.
    pub total: Decimal,
}

impl CheckoutSummary {
    /// Compute the summary for a cart with an optional promo code.
    #[must_use]
    pub fn compute(cart: &CartState, promo: Option<PromoCode>) -> Self {
        let subtotal = cart.total();
        let discount = promo.map_or(Decimal::ZERO, |p| p.discount_for(subtotal));

        let ships_free = cart.is_empty()
            || subtotal >= FREE_SHIPPING_THRESHOLD
            || promo.is_some_and(|p| p.waives_shipping());
        let shipping = if ships_free {
            Decimal::ZERO
        } else {
            STANDARD_SHIPPING
        };

        let tax = round_to_cents((subtotal - discount) * TAX_RATE);
        let total = subtotal - discount + shipping + tax;

        Self {
            subtotal,
            promo,
            discount,
            shipping,
            tax,
            total,
        }
    }
}
