//! Cart route handlers.
//!
//! Every mutation loads the session cart, runs it through the reducer and
//! saves the result before answering with the new cart as JSON.

use axum::{
    Json,
    extract::{Query, State},
};
use pickle_pot_core::{
    CartAction, CartState, CheckoutSummary, LineItem, LineItemId, MAX_LINE_QUANTITY,
    MIN_LINE_QUANTITY, PromoCode, reduce,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::SessionCart;
use crate::state::AppState;

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub id: LineItemId,
    pub quantity: i64,
}

/// Remove item request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub id: LineItemId,
}

/// Checkout summary query parameters.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub promo: Option<String>,
}

/// Sync response: the cart to display and how it was obtained.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub cart: CartState,
    pub sync: &'static str,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Apply one action to the session cart and persist the result.
async fn apply(session: Session, action: CartAction) -> Result<CartState> {
    let cart = SessionCart::new(session);
    let next = reduce(&cart.load().await?, action);
    cart.save(&next).await?;
    Ok(next)
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartState>> {
    Ok(Json(SessionCart::new(session).load().await?))
}

/// Add an item, merging with an existing line of the same id.
#[instrument(skip(session, item), fields(id = %item.id, quantity = item.quantity))]
pub async fn add(session: Session, Json(item): Json<LineItem>) -> Result<Json<CartState>> {
    if !(MIN_LINE_QUANTITY..=MAX_LINE_QUANTITY).contains(&item.quantity) {
        return Err(AppError::BadRequest(format!(
            "quantity must be between {MIN_LINE_QUANTITY} and {MAX_LINE_QUANTITY}"
        )));
    }

    add_breadcrumb("cart", "Added item", Some(&[("id", item.id.as_str())]));
    Ok(Json(apply(session, CartAction::AddItem(item)).await?))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartState>> {
    add_breadcrumb("cart", "Updated quantity", Some(&[("id", request.id.as_str())]));
    let action = CartAction::UpdateQuantity {
        id: request.id,
        quantity: request.quantity,
    };
    Ok(Json(apply(session, action).await?))
}

/// Remove a line. Unknown ids leave the cart unchanged.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<CartState>> {
    add_breadcrumb("cart", "Removed item", Some(&[("id", request.id.as_str())]));
    Ok(Json(
        apply(session, CartAction::RemoveItem(request.id)).await?,
    ))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartState>> {
    add_breadcrumb("cart", "Cleared cart", None);
    Ok(Json(apply(session, CartAction::ClearCart).await?))
}

/// Replace the cart with the signed-in customer's backend cart.
///
/// Never fails because of the backend: without a token or when the fetch
/// fails, the current cart is returned unchanged.
///
/// Only a successful sync writes the session. A skipped or failed sync leaves
/// it alone, so a cart change made by another request while the fetch was in
/// flight survives.
#[instrument(skip(state, session))]
pub async fn sync(State(state): State<AppState>, session: Session) -> Result<Json<SyncResponse>> {
    let cart = SessionCart::new(session);
    let local = cart.load().await?;
    let token = cart.token().await?;

    let outcome = state.cart_sync().sync(&local, token.as_ref()).await;
    let label = outcome.label();
    let synced = outcome.is_synced();
    let next = outcome.into_state();
    if synced {
        cart.save(&next).await?;
    }

    Ok(Json(SyncResponse {
        cart: next,
        sync: label,
    }))
}

/// Price breakdown for the current cart.
#[instrument(skip(session))]
pub async fn summary(
    session: Session,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<CheckoutSummary>> {
    let promo = query
        .promo
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::parse::<PromoCode>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let cart = SessionCart::new(session).load().await?;
    Ok(Json(CheckoutSummary::compute(&cart, promo)))
}
