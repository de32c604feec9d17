//! Cart lines

use std::fmt;

use crate::{
    pricing::line_total,
    products::{Product, ProductId},
};

/// Lines with this many units or fewer left are flagged to the shopper.
pub const CART_LOW_STOCK_THRESHOLD: u32 = 5;

const DEFAULT_VARIANT: &str = "default";

/// Key identifying one product variant in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    /// Build the key for a product with an optional color and size.
    pub fn for_variant(product_id: &ProductId, color: Option<&str>, size: Option<&str>) -> Self {
        Self(format!(
            "{product_id}_{}_{}",
            color.unwrap_or(DEFAULT_VARIANT),
            size.unwrap_or(DEFAULT_VARIANT)
        ))
    }

    /// Wrap a key received from the backend or the local cache.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product variant and its quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Unique key of the variant
    pub item_key: ItemKey,

    /// Product id
    pub product_id: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Unit price in minor units
    pub unit_price: i64,

    /// Pre-sale unit price in minor units
    pub original_price: Option<i64>,

    /// Image URL
    pub image: Option<String>,

    /// Units in the cart, at least one
    pub quantity: u32,

    /// Selected color
    pub color: Option<String>,

    /// Selected size
    pub size: Option<String>,

    /// Units the store had in stock when the line was last refreshed
    pub stock: u32,
}

impl CartLine {
    /// Create a line for `quantity` units of a product variant.
    pub fn from_product(
        product: &Product,
        quantity: u32,
        color: Option<String>,
        size: Option<String>,
    ) -> Self {
        Self {
            item_key: ItemKey::for_variant(&product.id, color.as_deref(), size.as_deref()),
            product_id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            unit_price: product.price,
            original_price: product.original_price,
            image: product.image.clone(),
            quantity,
            color,
            size,
            stock: product.stock,
        }
    }

    /// Unit price times quantity, in minor units.
    pub fn line_total(&self) -> i64 {
        line_total(self.unit_price, self.quantity)
    }

    /// Returns true when few units remain.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= CART_LOW_STOCK_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use crate::products::test_support::product;

    use super::*;

    #[test]
    fn item_key_defaults_missing_variants() {
        let id = ProductId::new("42");

        assert_eq!(
            ItemKey::for_variant(&id, Some("Black"), Some("M")).as_str(),
            "42_Black_M"
        );
        assert_eq!(
            ItemKey::for_variant(&id, None, Some("M")).as_str(),
            "42_default_M"
        );
        assert_eq!(
            ItemKey::for_variant(&id, None, None).as_str(),
            "42_default_default"
        );
    }

    #[test]
    fn from_product_copies_details() {
        let shirt = product("7", "Linen Shirt", "Zara", "shirts", 1_800_000);

        let line = CartLine::from_product(&shirt, 2, Some("White".to_string()), None);

        assert_eq!(line.item_key.as_str(), "7_White_default");
        assert_eq!(line.name, "Linen Shirt");
        assert_eq!(line.unit_price, 1_800_000);
        assert_eq!(line.line_total(), 3_600_000);
        assert_eq!(line.stock, 20);
    }

    #[test]
    fn low_stock_includes_five() {
        let mut line = CartLine::from_product(
            &product("7", "Linen Shirt", "Zara", "shirts", 1_800_000),
            1,
            None,
            None,
        );

        line.stock = 6;
        assert!(!line.is_low_stock());

        line.stock = 5;
        assert!(line.is_low_stock());
    }
}
