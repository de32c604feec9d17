//! Cart
//!
//! The cart is explicit state owned by the caller. All mutations go through [`Cart`], which
//! keeps item keys unique and quantities at least one.

use thiserror::Error;

use crate::{products::ProductId, promotions::PromoCode};

mod line;
mod totals;

pub use line::{CART_LOW_STOCK_THRESHOLD, CartLine, ItemKey};
pub use totals::{CartTotals, TotalsPolicy, compute_totals};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line must hold at least one unit.
    #[error("quantity must be at least one")]
    ZeroQuantity,

    /// Unit prices cannot be negative.
    #[error("unit price for {0} is negative")]
    NegativePrice(ItemKey),

    /// No line has the given key.
    #[error("no cart line with key {0}")]
    NotFound(ItemKey),
}

/// Item the shopper asked to add, before it is resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Product to add
    pub product_id: ProductId,

    /// Units to add
    pub quantity: u32,

    /// Selected color
    pub color: Option<String>,

    /// Selected size
    pub size: Option<String>,
}

impl NewCartItem {
    /// Key of the line this item lands in.
    pub fn item_key(&self) -> ItemKey {
        ItemKey::for_variant(&self.product_id, self.color.as_deref(), self.size.as_deref())
    }
}

/// Ordered set of cart lines with unique item keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines, merging duplicate keys and dropping empty lines.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines {
            if line.quantity == 0 || line.unit_price < 0 {
                continue;
            }

            cart.merge_line(line);
        }

        cart
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart, returning its lines.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Find a line by key.
    pub fn get(&self, key: &ItemKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item_key == key)
    }

    /// Add a line, summing quantities with any existing line of the same key.
    ///
    /// Returns the resulting quantity of that line.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`] when the line holds no units.
    /// - [`CartError::NegativePrice`] when the unit price is below zero.
    pub fn add(&mut self, line: CartLine) -> Result<u32, CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if line.unit_price < 0 {
            return Err(CartError::NegativePrice(line.item_key));
        }

        Ok(self.merge_line(line))
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] when no line has `key`.
    pub fn set_quantity(&mut self, key: &ItemKey, quantity: u32) -> Result<u32, CartError> {
        let index = self.position(key)?;

        if quantity == 0 {
            self.lines.remove(index);
            return Ok(0);
        }

        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }

        Ok(quantity)
    }

    /// Change a line's quantity by `delta`, removing it when the result is zero or less.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] when no line has `key`.
    pub fn adjust_quantity(&mut self, key: &ItemKey, delta: i64) -> Result<u32, CartError> {
        let current = self.get(key).map(|line| line.quantity);
        let current = current.ok_or_else(|| CartError::NotFound(key.clone()))?;

        let next = i64::from(current).saturating_add(delta).max(0);
        let next = u32::try_from(next).unwrap_or(u32::MAX);

        self.set_quantity(key, next)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] when no line has `key`.
    pub fn remove(&mut self, key: &ItemKey) -> Result<CartLine, CartError> {
        let index = self.position(key)?;

        Ok(self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals in minor units.
    pub fn subtotal(&self) -> i64 {
        self.lines
            .iter()
            .fold(0_i64, |sum, line| sum.saturating_add(line.line_total()))
    }

    /// Totals under the default store policy.
    pub fn totals(&self, promo: Option<&PromoCode>) -> CartTotals {
        compute_totals(&self.lines, promo)
    }

    fn position(&self, key: &ItemKey) -> Result<usize, CartError> {
        self.lines
            .iter()
            .position(|line| &line.item_key == key)
            .ok_or_else(|| CartError::NotFound(key.clone()))
    }

    fn merge_line(&mut self, line: CartLine) -> u32 {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.item_key == line.item_key)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                existing.quantity
            }
            None => {
                let quantity = line.quantity;
                self.lines.push(line);
                quantity
            }
        }
    }
}
