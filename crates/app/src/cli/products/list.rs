use clap::Args;
use rust_decimal::Decimal;
use storefront::catalog::{
    DEFAULT_PRICE_MAX, DEFAULT_PRICE_MIN, ProductFilter, ProductQuery, SortOrder,
};
use storefront_app::context::AppContext;

use crate::cli::{tables, to_minor};

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    /// Only these categories (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Only these brands (repeatable)
    #[arg(long = "brand")]
    brands: Vec<String>,

    /// Match name or brand
    #[arg(long)]
    search: Option<String>,

    /// Lowest price in naira
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest price in naira
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Sort order (featured, price-low, price-high, name)
    #[arg(long, default_value = "featured")]
    sort: SortOrder,
}

pub(crate) async fn run(context: &AppContext, args: ListProductsArgs) -> Result<(), String> {
    let min_price = args.min_price.map(to_minor).transpose()?;
    let max_price = args.max_price.map(to_minor).transpose()?;

    let query = ProductQuery {
        category: single(&args.categories),
        brand: single(&args.brands),
        min_price,
        max_price,
        search: args.search.clone(),
    };

    let filter = ProductFilter::default()
        .with_search(args.search.as_deref().unwrap_or_default())
        .with_categories(args.categories)
        .with_brands(args.brands)
        .with_price_range(
            min_price.unwrap_or(DEFAULT_PRICE_MIN),
            max_price.unwrap_or(DEFAULT_PRICE_MAX),
        );

    let products = context
        .catalog
        .browse(&query, &filter, args.sort)
        .await
        .map_err(|error| format!("failed to load products: {error}"))?;

    if products.is_empty() {
        println!("no products match");
        return Ok(());
    }

    println!("{}", tables::products(&products));
    println!("{} products", products.len());

    Ok(())
}

/// The backend filters on one category and one brand. Several are filtered locally.
fn single(values: &[String]) -> Option<String> {
    match values {
        [only] => Some(only.clone()),
        _ => None,
    }
}
