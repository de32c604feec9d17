use clap::Args;
use storefront::{pricing::money, products::ProductId};
use storefront_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ShowProductArgs {
    /// Product id
    id: String,
}

pub(crate) async fn run(context: &AppContext, args: ShowProductArgs) -> Result<(), String> {
    let product = context
        .catalog
        .product(&ProductId::new(args.id))
        .await
        .map_err(|error| format!("failed to load product: {error}"))?
        .with_default_variants();

    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("brand: {}", product.brand);
    println!("category: {}", product.category);
    println!("price: {}", money(product.price));

    if let Some(original) = product.original_price {
        println!("original_price: {}", money(original));
    }

    println!(
        "stock: {}{}",
        product.stock,
        if product.is_low_stock() { " (low)" } else { "" }
    );
    println!("colors: {}", product.colors.join(", "));
    println!("sizes: {}", product.sizes.join(", "));

    if let Some(image) = &product.image {
        println!("image: {image}");
    }

    Ok(())
}
