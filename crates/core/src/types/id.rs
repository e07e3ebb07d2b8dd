//! Newtype keys for type-safe entity references.
//!
//! Use the `define_key!` macro to create string-backed key wrappers that
//! prevent accidentally mixing keys from different entity types.

/// Macro to define a type-safe string key wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pickle_pot_core::define_key;
/// define_key!(SkuCode);
///
/// let sku = SkuCode::new("MP001-6OZ");
/// assert_eq!(sku.as_str(), "MP001-6OZ");
/// ```
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new key from any string-like value.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_string())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }
    };
}

define_key!(LineItemId);
define_key!(ProductId);

impl LineItemId {
    /// Build the merge key for a product variant.
    ///
    /// The key is `"{product}-{size}"`, or `"{product}-{size}-{spice}"` when
    /// a spice level is chosen, so the same jar in the same size lands on the
    /// same cart line.
    #[must_use]
    pub fn for_variant(product_id: &ProductId, size: &str, spice: Option<&str>) -> Self {
        match spice {
            Some(spice) if !spice.is_empty() => Self(format!("{product_id}-{size}-{spice}")),
            _ => Self(format!("{product_id}-{size}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_variant_without_spice() {
        let id = LineItemId::for_variant(&ProductId::new("1"), "6oz", None);
        assert_eq!(id.as_str(), "1-6oz");
    }

    #[test]
    fn test_for_variant_with_spice() {
        let id = LineItemId::for_variant(&ProductId::new("7"), "8oz", Some("hot"));
        assert_eq!(id.as_str(), "7-8oz-hot");
    }

    #[test]
    fn test_for_variant_empty_spice_is_ignored() {
        let id = LineItemId::for_variant(&ProductId::new("7"), "8oz", Some(""));
        assert_eq!(id, LineItemId::from("7-8oz"));
    }
}
