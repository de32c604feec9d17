//! Cart line wire shape

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{CartLine, ItemKey},
    normalize::{
        NormalizeError,
        fields::{WireId, clean_text, to_major, to_minor},
    },
    products::ProductId,
};

/// Cart line as stored by the backend, in orders, and in the local `cart` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCartLine {
    /// Variant key; derived from the product and variants when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_key: Option<String>,

    /// Product id
    #[serde(default)]
    pub product_id: Option<WireId>,

    /// Product id under its catalog name, used by older order records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,

    /// Product name
    #[serde(default)]
    pub name: Option<String>,

    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,

    /// Unit price in major units
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Pre-sale unit price in major units
    #[serde(
        rename = "originalPrice",
        alias = "original_price",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Units
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Selected color
    #[serde(default)]
    pub color: Option<String>,

    /// Selected size
    #[serde(default)]
    pub size: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,
}

fn default_quantity() -> u32 {
    1
}

impl TryFrom<WireCartLine> for CartLine {
    type Error = NormalizeError;

    fn try_from(wire: WireCartLine) -> Result<Self, Self::Error> {
        let product_id = wire
            .product_id
            .or(wire.id)
            .map(|id| ProductId::new(id.to_string()))
            .ok_or(NormalizeError::Missing("product_id"))?;

        let color = clean_text(wire.color);
        let size = clean_text(wire.size);

        let item_key = clean_text(wire.item_key).map_or_else(
            || ItemKey::for_variant(&product_id, color.as_deref(), size.as_deref()),
            ItemKey::from_raw,
        );

        Ok(Self {
            item_key,
            product_id,
            name: clean_text(wire.name).unwrap_or_else(|| "Unknown Product".to_string()),
            brand: clean_text(wire.brand).unwrap_or_default(),
            unit_price: to_minor(wire.price)?,
            original_price: wire.original_price.map(to_minor).transpose()?,
            image: clean_text(wire.image),
            quantity: wire.quantity,
            color,
            size,
            stock: wire.stock,
        })
    }
}

impl From<&CartLine> for WireCartLine {
    fn from(line: &CartLine) -> Self {
        Self {
            item_key: Some(line.item_key.to_string()),
            product_id: Some(WireId::from_text(line.product_id.as_str())),
            id: None,
            name: Some(line.name.clone()),
            brand: Some(line.brand.clone()),
            price: to_major(line.unit_price),
            original_price: line.original_price.map(to_major),
            image: line.image.clone(),
            quantity: line.quantity,
            color: line.color.clone(),
            size: line.size.clone(),
            stock: line.stock,
        }
    }
}
