//! Products

use std::fmt;

use thiserror::Error;

/// Colors offered when the backend does not list any.
pub const DEFAULT_COLORS: [&str; 3] = ["Black", "White", "Gray"];

/// Sizes offered when the backend does not list any.
pub const DEFAULT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];

/// Products with fewer units than this are reported as low stock on the dashboard.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Product identifier as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Catalog category
    pub category: String,

    /// Current price in minor units
    pub price: i64,

    /// Pre-sale price in minor units, if the product is discounted
    pub original_price: Option<i64>,

    /// Units in stock
    pub stock: u32,

    /// Available colors
    pub colors: Vec<String>,

    /// Available sizes
    pub sizes: Vec<String>,

    /// Whether the product is flagged as on sale
    pub on_sale: bool,

    /// Image URL
    pub image: Option<String>,
}

impl Product {
    /// Fill in the default color and size lists when the product has none.
    #[must_use]
    pub fn with_default_variants(mut self) -> Self {
        if self.colors.is_empty() {
            self.colors = DEFAULT_COLORS.iter().map(ToString::to_string).collect();
        }

        if self.sizes.is_empty() {
            self.sizes = DEFAULT_SIZES.iter().map(ToString::to_string).collect();
        }

        self
    }

    /// Returns true when stock is below [`LOW_STOCK_THRESHOLD`].
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

/// Errors raised when validating a product form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductDraftError {
    /// Name, brand or category is empty.
    #[error("please fill in all required fields (name, brand, price, category)")]
    MissingFields,

    /// Price must be above zero.
    #[error("price must be greater than zero")]
    InvalidPrice,
}

/// Product as entered on the admin form, before the backend assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Display name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Catalog category
    pub category: String,

    /// Price in minor units
    pub price: i64,

    /// Units in stock
    pub stock: u32,

    /// Available colors
    pub colors: Vec<String>,

    /// Available sizes
    pub sizes: Vec<String>,

    /// Image URL
    pub image: Option<String>,
}

impl ProductDraft {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// - [`ProductDraftError::MissingFields`] when name, brand or category is blank.
    /// - [`ProductDraftError::InvalidPrice`] when the price is zero or negative.
    pub fn validate(&self) -> Result<(), ProductDraftError> {
        if [&self.name, &self.brand, &self.category]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ProductDraftError::MissingFields);
        }

        if self.price <= 0 {
            return Err(ProductDraftError::InvalidPrice);
        }

        Ok(())
    }
}

/// Split a comma separated list such as `"S, M, L"`, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
