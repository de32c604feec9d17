//! Catalog browsing

use std::{cmp::Ordering, str::FromStr};

use thiserror::Error;

use crate::products::Product;

/// Default lower bound of the price filter, in minor units.
pub const DEFAULT_PRICE_MIN: i64 = 0;

/// Default upper bound of the price filter, in minor units (200,000 naira).
pub const DEFAULT_PRICE_MAX: i64 = 20_000_000;

/// Client-side product filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    search: Option<String>,
    categories: Vec<String>,
    brands: Vec<String>,
    price_min: i64,
    price_max: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            categories: Vec::new(),
            brands: Vec::new(),
            price_min: DEFAULT_PRICE_MIN,
            price_max: DEFAULT_PRICE_MAX,
        }
    }
}

impl ProductFilter {
    /// Match products whose name or brand contains `term`, ignoring case.
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    /// Restrict to the given categories. An empty list matches every category.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = String>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Restrict to the given brands. An empty list matches every brand.
    #[must_use]
    pub fn with_brands(mut self, brands: impl IntoIterator<Item = String>) -> Self {
        self.brands = brands.into_iter().collect();
        self
    }

    /// Restrict to an inclusive price range in minor units.
    ///
    /// A minimum above the maximum is pulled down to the maximum.
    #[must_use]
    pub fn with_price_range(mut self, min: i64, max: i64) -> Self {
        self.price_min = min.min(max);
        self.price_max = max;
        self
    }

    /// Lower price bound in minor units.
    pub fn price_min(&self) -> i64 {
        self.price_min
    }

    /// Upper price bound in minor units.
    pub fn price_max(&self) -> i64 {
        self.price_max
    }

    /// Returns true when `product` passes every active criterion.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            let in_name = product.name.to_lowercase().contains(term.as_str());
            let in_brand = product.brand.to_lowercase().contains(term.as_str());

            if !in_name && !in_brand {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }

        (self.price_min..=self.price_max).contains(&product.price)
    }
}

/// Filters the backend applies when listing products. Prices are in minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category name
    pub category: Option<String>,

    /// Brand name
    pub brand: Option<String>,

    /// Lowest price
    pub min_price: Option<i64>,

    /// Highest price
    pub max_price: Option<i64>,

    /// Free text search
    pub search: Option<String>,
}

/// Catalog sort orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Backend order.
    #[default]
    Featured,

    /// Cheapest first.
    PriceLowToHigh,

    /// Most expensive first.
    PriceHighToLow,

    /// Alphabetical by name.
    Name,
}

/// Unknown sort order name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLowToHigh),
            "price-high" => Ok(Self::PriceHighToLow),
            "name" => Ok(Self::Name),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => Ordering::Equal,
            Self::PriceLowToHigh => a.price.cmp(&b.price),
            Self::PriceHighToLow => b.price.cmp(&a.price),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// Filter then sort `products`, borrowing the matches.
///
/// Sorting is stable, so [`SortOrder::Featured`] keeps the backend order.
pub fn browse<'a>(
    products: &'a [Product],
    filter: &ProductFilter,
    order: SortOrder,
) -> Vec<&'a Product> {
    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|product| filter.matches(product))
        .collect();

    matches.sort_by(|a, b| order.compare(a, b));

    matches
}

#[cfg(test)]
mod tests {
    use crate::products::test_support::product;

    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Linen Shirt", "Zara", "shirts", 1_800_000),
            product("2", "denim jacket", "Levi's", "jackets", 4_500_000),
            product("3", "Air Max", "Nike", "shoes", 9_000_000),
            product("4", "Zara Scarf", "Mango", "accessories", 800_000),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn default_filter_matches_everything_in_featured_order() {
        let products = catalog();

        let result = browse(&products, &ProductFilter::default(), SortOrder::Featured);

        assert_eq!(ids(&result), ["1", "2", "3", "4"]);
    }

    #[test]
    fn search_checks_name_and_brand_case_insensitively() {
        let products = catalog();
        let filter = ProductFilter::default().with_search("  ZARA ");

        let result = browse(&products, &filter, SortOrder::Featured);

        assert_eq!(ids(&result), ["1", "4"]);
    }

    #[test]
    fn categories_and_brands_narrow_results() {
        let products = catalog();
        let filter = ProductFilter::default()
            .with_categories(["shirts".to_string(), "shoes".to_string()])
            .with_brands(["Nike".to_string()]);

        let result = browse(&products, &filter, SortOrder::Featured);

        assert_eq!(ids(&result), ["3"]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let products = catalog();
        let filter = ProductFilter::default().with_price_range(800_000, 1_800_000);

        let result = browse(&products, &filter, SortOrder::Featured);

        assert_eq!(ids(&result), ["1", "4"]);
    }

    #[test]
    fn min_above_max_is_clamped() {
        let filter = ProductFilter::default().with_price_range(5_000_000, 1_000_000);

        assert_eq!(filter.price_min(), 1_000_000);
        assert_eq!(filter.price_max(), 1_000_000);
    }

    #[test]
    fn default_price_ceiling_excludes_expensive_products() {
        let mut products = catalog();
        products.push(product("5", "Gold Watch", "Rolex", "accessories", 25_000_000));

        let result = browse(&products, &ProductFilter::default(), SortOrder::Featured);

        assert_eq!(result.len(), 4);
    }

    #[test]
    fn sorts_by_price_and_name() {
        let products = catalog();
        let filter = ProductFilter::default();

        assert_eq!(
            ids(&browse(&products, &filter, SortOrder::PriceLowToHigh)),
            ["4", "1", "2", "3"]
        );
        assert_eq!(
            ids(&browse(&products, &filter, SortOrder::PriceHighToLow)),
            ["3", "2", "1", "4"]
        );
        assert_eq!(
            ids(&browse(&products, &filter, SortOrder::Name)),
            ["3", "2", "1", "4"]
        );
    }

    #[test]
    fn sort_order_parses_select_values() {
        assert_eq!("price-low".parse(), Ok(SortOrder::PriceLowToHigh));
        assert_eq!("price-high".parse(), Ok(SortOrder::PriceHighToLow));
        assert_eq!("name".parse(), Ok(SortOrder::Name));
        assert_eq!("featured".parse(), Ok(SortOrder::Featured));
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
