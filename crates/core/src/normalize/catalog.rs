//! Product wire shapes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::ProductQuery,
    normalize::{
        NormalizeError,
        fields::{WireId, WireList, clean_text, to_major, to_minor},
    },
    products::{Product, ProductDraft, ProductId},
};

/// Product as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireProduct {
    /// Product id
    pub id: WireId,

    /// Display name
    pub name: String,

    /// Brand name
    #[serde(default)]
    pub brand: String,

    /// Catalog category
    #[serde(default)]
    pub category: String,

    /// Price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Pre-sale price in major units
    #[serde(
        rename = "originalPrice",
        alias = "original_price",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Colors
    #[serde(default)]
    pub colors: WireList,

    /// Sizes
    #[serde(default)]
    pub sizes: WireList,

    /// Sale flag
    #[serde(rename = "onSale", alias = "on_sale", default)]
    pub on_sale: bool,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

impl TryFrom<WireProduct> for Product {
    type Error = NormalizeError;

    fn try_from(wire: WireProduct) -> Result<Self, Self::Error> {
        let product = Self {
            id: ProductId::new(wire.id.to_string()),
            name: wire.name,
            brand: wire.brand,
            category: wire.category,
            price: to_minor(wire.price)?,
            original_price: wire.original_price.map(to_minor).transpose()?,
            stock: wire.stock,
            colors: wire.colors.into_items(),
            sizes: wire.sizes.into_items(),
            on_sale: wire.on_sale,
            image: clean_text(wire.image),
        };

        Ok(product.with_default_variants())
    }
}

/// Body of the admin create and update product requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireProductDraft {
    /// Display name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Catalog category
    pub category: String,

    /// Units in stock
    pub stock: u32,

    /// Image URL, empty when none was given
    #[serde(default)]
    pub image: String,

    /// Colors
    pub colors: Vec<String>,

    /// Sizes
    pub sizes: Vec<String>,

    /// Sale flag
    #[serde(rename = "onSale")]
    pub on_sale: bool,
}

impl From<&ProductDraft> for WireProductDraft {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            brand: draft.brand.trim().to_string(),
            price: to_major(draft.price),
            category: draft.category.trim().to_string(),
            stock: draft.stock,
            image: draft.image.clone().unwrap_or_default(),
            colors: draft.colors.clone(),
            sizes: draft.sizes.clone(),
            on_sale: false,
        }
    }
}

/// Query string of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WireProductQuery {
    /// Category name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Brand name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Lowest price in major units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,

    /// Highest price in major units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,

    /// Free text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl From<&ProductQuery> for WireProductQuery {
    fn from(query: &ProductQuery) -> Self {
        Self {
            category: query.category.clone(),
            brand: query.brand.clone(),
            min_price: query.min_price.map(to_major),
            max_price: query.max_price.map(to_major),
            search: query.search.clone(),
        }
    }
}
