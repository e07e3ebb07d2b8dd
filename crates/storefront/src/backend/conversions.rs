//! Translate backend cart payloads into cart line items.

use pickle_pot_core::{LineItem, ProductCategory};

use super::types::{RemoteCart, RemoteCartItem};

/// Image shown when the backend has none for a product.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Badge applied to featured products.
pub const FEATURED_BADGE: &str = "Featured";

/// Convert a whole backend cart.
///
/// Lines with non-positive quantities come through with quantity zero and
/// are dropped when the cart state is rebuilt.
#[must_use]
pub fn convert_remote_cart(cart: RemoteCart) -> Vec<LineItem> {
    cart.items.into_iter().map(convert_remote_item).collect()
}

fn convert_remote_item(item: RemoteCartItem) -> LineItem {
    let quantity = if item.quantity <= 0 {
        0
    } else {
        u32::try_from(item.quantity).unwrap_or(u32::MAX)
    };

    let image = item
        .product
        .images
        .into_iter()
        .next()
        .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), |img| img.url);

    LineItem {
        id: item.id.into(),
        name: item.product.name,
        unit_price: item.price,
        original_price: item.variant.original_price,
        image: Some(image),
        size: item.variant.size,
        quantity,
        delivery_date: None,
        category: ProductCategory::from_category_name(&item.product.category.name),
        badge: item
            .product
            .is_featured
            .then(|| FEATURED_BADGE.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use pickle_pot_core::{CartAction, CartState, PriceValue, reduce};
    use rust_decimal::Decimal;

    use super::*;

    fn remote(json: &str) -> RemoteCart {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_convert_full_item() {
        let cart = remote(
            r#"{
                "id": "cart1",
                "items": [{
                    "id": "item1",
                    "quantity": 2,
                    "price": 12.99,
                    "product": {
                        "name": "Mango Pickle",
                        "images": [{"url": "/img/mango.jpg"}, {"url": "/img/mango-2.jpg"}],
                        "category": {"name": "Traditional Pickles"},
                        "isFeatured": true
                    },
                    "variant": {"size": "6oz", "originalPrice": "$15.99"}
                }]
            }"#,
        );

        let items = convert_remote_cart(cart);
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.id.as_str(), "item1");
        assert_eq!(item.name, "Mango Pickle");
        assert_eq!(item.unit_amount(), Decimal::from_str("12.99").unwrap());
        assert_eq!(item.original_price, Some(PriceValue::from("$15.99")));
        assert_eq!(item.image.as_deref(), Some("/img/mango.jpg"));
        assert_eq!(item.size, "6oz");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.category, ProductCategory::Pickle);
        assert_eq!(item.badge.as_deref(), Some("Featured"));
    }

    #[test]
    fn test_convert_defaults_for_sparse_item() {
        let cart = remote(
            r#"{
                "items": [{
                    "id": "item2",
                    "quantity": 1,
                    "price": "$4.50",
                    "product": {"name": "Chili Powder", "category": {"name": "Spice Powders"}}
                }]
            }"#,
        );

        let items = convert_remote_cart(cart);
        let item = &items[0];
        assert_eq!(item.image.as_deref(), Some(PLACEHOLDER_IMAGE));
        assert_eq!(item.category, ProductCategory::Powder);
        assert_eq!(item.badge, None);
        assert_eq!(item.size, "");
        assert_eq!(item.original_price, None);
    }

    #[test]
    fn test_convert_empty_cart() {
        assert!(convert_remote_cart(remote(r#"{"items": []}"#)).is_empty());
    }

    #[test]
    fn test_cart_without_items_array_does_not_parse() {
        assert!(serde_json::from_str::<RemoteCart>(r#"{"id": "c1"}"#).is_err());
    }

    #[test]
    fn test_non_positive_quantities_are_dropped_by_sync() {
        let cart = remote(
            r#"{
                "items": [
                    {"id": "a", "quantity": 0, "price": 1, "product": {"name": "A"}},
                    {"id": "b", "quantity": -2, "price": 1, "product": {"name": "B"}},
                    {"id": "c", "quantity": 3, "price": 1.5, "product": {"name": "C"}}
                ]
            }"#,
        );

        let state = reduce(
            &CartState::empty(),
            CartAction::SyncFromRemote(convert_remote_cart(cart)),
        );
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.item_count(), 3);
        assert_eq!(state.total(), Decimal::from_str("4.50").unwrap());
    }
}
